//! Request-body field types shared by the transaction endpoints.

use serde::Deserialize;

use crate::Error;

/// A transaction amount as received on the wire.
///
/// Browser clients send amounts as JSON numbers or as numeric strings
/// (form inputs produce strings), so both are accepted and coerced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    /// The amount arrived as a JSON number.
    Number(f64),
    /// The amount arrived as a string to be parsed.
    Text(String),
}

impl AmountField {
    /// Coerce the field to a number.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if a string amount does not parse.
    pub fn to_f64(&self) -> Result<f64, Error> {
        match self {
            AmountField::Number(amount) => Ok(*amount),
            AmountField::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| Error::InvalidAmount(text.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::AmountField;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(AmountField::Number(12.5).to_f64().unwrap(), 12.5);
        assert_eq!(
            AmountField::Text("12.5".to_owned()).to_f64().unwrap(),
            12.5
        );
        assert_eq!(
            AmountField::Text(" 42 ".to_owned()).to_f64().unwrap(),
            42.0
        );
    }

    #[test]
    fn rejects_non_numeric_strings() {
        for text in ["", "abc", "12abc"] {
            assert_eq!(
                AmountField::Text(text.to_owned()).to_f64(),
                Err(Error::InvalidAmount(text.to_owned()))
            );
        }
    }

    #[test]
    fn deserializes_either_shape() {
        let number: AmountField = serde_json::from_str("50").unwrap();
        assert_eq!(number, AmountField::Number(50.0));

        let text: AmountField = serde_json::from_str("\"50\"").unwrap();
        assert_eq!(text, AmountField::Text("50".to_owned()));
    }
}
