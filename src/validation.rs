//! Input guards shared by the cache, providers and components.
//!
//! Every guard returns [`Error::Validation`] on failure and never touches
//! storage or the network.

use serde_json::Value;

use crate::database::models::{Chain, Token};
use crate::errors::{Error, Result};

/// String fields every token object must carry.
const TOKEN_STRING_FIELDS: [&str; 5] = ["address", "chain", "logoURI", "name", "symbol"];

/// Fails if `value` is empty once all whitespace is removed.
pub fn validate_non_empty_string(value: &str, name: &str) -> Result<()> {
    if value.chars().all(char::is_whitespace) {
        return Err(Error::Validation(format!(
            "Parameter \"{}\" must be a non-empty string",
            name
        )));
    }
    Ok(())
}

pub fn validate_non_zero_interval(interval_ms: i64) -> Result<()> {
    if interval_ms <= 0 {
        return Err(Error::Validation(format!(
            "Parameter \"interval_ms\" must be a positive number, got {}",
            interval_ms
        )));
    }
    Ok(())
}

pub fn validate_chain(value: &str) -> Result<Chain> {
    value.parse()
}

/// Every element must be a non-empty string.
pub fn validate_string_array(values: &[String], name: &str) -> Result<()> {
    for value in values {
        validate_non_empty_string(value, name)?;
    }
    Ok(())
}

pub fn validate_token(token: &Token) -> Result<()> {
    validate_non_empty_string(&token.name, "token.name")?;
    validate_non_empty_string(&token.address, "token.address")?;
    Ok(())
}

pub fn validate_token_array(tokens: &[Token]) -> Result<()> {
    tokens.iter().try_for_each(validate_token)
}

/// Shape guard for a raw token object, e.g. an entry of a provider token list.
pub fn validate_token_value(value: &Value) -> Result<Token> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::Validation(format!("Parameter \"token\" must be an object: {}", value)))?;

    for field in TOKEN_STRING_FIELDS {
        match object.get(field) {
            Some(Value::String(_)) => {}
            Some(Value::Null) | None => {
                return Err(Error::Validation(format!(
                    "Token field \"{}\" cannot be null or undefined",
                    field
                )))
            }
            Some(other) => {
                return Err(Error::Validation(format!(
                    "Token field \"{}\" must be a string, got {}",
                    field, other
                )))
            }
        }
    }

    let token: Token = serde_json::from_value(value.clone())
        .map_err(|e| Error::Validation(format!("Invalid token: {}", e)))?;
    validate_token(&token)?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_empty_string() {
        assert!(validate_non_empty_string("key", "key").is_ok());
        assert!(validate_non_empty_string("", "key").is_err());
        assert!(validate_non_empty_string(" \t\n", "key").is_err());
    }

    #[test]
    fn test_non_zero_interval() {
        assert!(validate_non_zero_interval(1).is_ok());
        assert!(validate_non_zero_interval(0).is_err());
        assert!(validate_non_zero_interval(-5).is_err());
    }

    #[test]
    fn test_string_array() {
        assert!(validate_string_array(&[], "ids").is_ok());
        assert!(validate_string_array(&["bitcoin".to_string()], "ids").is_ok());
        assert!(validate_string_array(&["bitcoin".to_string(), " ".to_string()], "ids").is_err());
    }

    #[test]
    fn test_token_value_requires_all_fields() {
        let valid = json!({
            "address": "0x1",
            "chain": "Ethereum",
            "logoURI": "",
            "name": "Foo",
            "symbol": "F"
        });
        let token = validate_token_value(&valid).unwrap();
        assert_eq!(token.chain, Chain::Ethereum);

        let mut missing_logo = valid.clone();
        missing_logo.as_object_mut().unwrap().remove("logoURI");
        assert!(validate_token_value(&missing_logo).is_err());

        let mut numeric_symbol = valid.clone();
        numeric_symbol["symbol"] = json!(5);
        assert!(validate_token_value(&numeric_symbol).is_err());

        let mut bad_chain = valid.clone();
        bad_chain["chain"] = json!("Solana");
        assert!(validate_token_value(&bad_chain).is_err());

        assert!(validate_token_value(&json!("token")).is_err());
    }

    #[test]
    fn test_token_requires_name_and_address() {
        let mut token = Token::new(
            "0x1".to_string(),
            Chain::Ethereum,
            "Foo".to_string(),
            "F".to_string(),
        );
        assert!(validate_token(&token).is_ok());
        token.name = "  ".to_string();
        assert!(validate_token(&token).is_err());
        assert!(validate_token_array(&[token]).is_err());
    }
}
