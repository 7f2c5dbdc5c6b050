//! # Token Ledger
//!
//! Issues and consumes single-use creation tokens. Every function here runs inside a
//! caller's [`Transaction`], so consumption commits or rolls back together with the
//! row the token pays for.

use crate::error::ServiceError;
use crate::framework::{Entity, Transaction};
use crate::model::Token;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};

/// Bytes of entropy per token. Hex-encoded this is 32 characters, the column width.
const TOKEN_BYTES: usize = 16;

/// A fresh random token value.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Store a new unused token and return its value.
pub fn issue(txn: &mut Transaction<'_>) -> String {
    loop {
        let value = generate_token_value();
        if txn.find::<Token>(&value).is_some() {
            warn!("Token collision, regenerating");
            continue;
        }
        let token = txn.insert::<Token>(value);
        debug!(token_id = token.id, "Issued token");
        return token.value;
    }
}

/// Mark the token `value` as used.
///
/// # Errors
/// - [`ServiceError::InvalidToken`] if no such token was issued.
/// - [`ServiceError::TokenAlreadyUsed`] if it was consumed before.
pub fn consume(txn: &mut Transaction<'_>, value: &str) -> Result<(), ServiceError> {
    let token_id = txn
        .find::<Token>(value)
        .map(|token| token.id)
        .ok_or(ServiceError::InvalidToken)?;

    txn.try_update::<Token, _, _>(token_id, |token| {
        if token.used {
            return Err(ServiceError::TokenAlreadyUsed);
        }
        token.used = true;
        Ok(())
    })
    .unwrap_or(Err(ServiceError::InvalidToken))
}

/// Consume `token` and insert a `T` built from `params`, in that order.
///
/// If either step fails, the caller's transaction rolls back and the token stays
/// unused.
pub fn create_with_token<T: Entity>(
    txn: &mut Transaction<'_>,
    token: &str,
    params: T::Create,
) -> Result<T, ServiceError> {
    consume(txn, token)?;
    Ok(txn.insert::<T>(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Tables;
    use crate::model::{User, UserCreate};

    fn alice() -> UserCreate {
        UserCreate {
            name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn test_generated_values_fit_the_column() {
        let value = generate_token_value();
        assert_eq!(value.len(), 32);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(value, generate_token_value());
    }

    #[test]
    fn test_token_is_single_use() {
        let mut tables = Tables::new();
        let mut txn = Transaction::begin(&mut tables);
        let value = issue(&mut txn);

        assert_eq!(consume(&mut txn, &value), Ok(()));
        assert_eq!(
            consume(&mut txn, &value),
            Err(ServiceError::TokenAlreadyUsed)
        );
        assert_eq!(consume(&mut txn, "nope"), Err(ServiceError::InvalidToken));
        txn.commit().unwrap();
    }

    #[test]
    fn test_rollback_returns_token_to_unused() {
        let mut tables = Tables::new();
        let value = {
            let mut txn = Transaction::begin(&mut tables);
            let value = issue(&mut txn);
            txn.commit().unwrap();
            value
        };

        {
            let mut txn = Transaction::begin(&mut tables);
            let user = create_with_token::<User>(&mut txn, &value, alice()).unwrap();
            assert_eq!(user.id, 1);
            txn.rollback();
        }

        let token = tables.table::<Token>().unwrap().iter().next().unwrap();
        assert!(!token.used);
        assert!(tables.table::<User>().unwrap().is_empty());
    }

    #[test]
    fn test_tokens_are_found_by_value_among_many() {
        let mut tables = Tables::new();
        let mut txn = Transaction::begin(&mut tables);
        let values: Vec<String> = (0..500).map(|_| issue(&mut txn)).collect();
        txn.commit().unwrap();

        let mut txn = Transaction::begin(&mut tables);
        assert_eq!(consume(&mut txn, &values[321]), Ok(()));
        let token = txn.find::<Token>(&values[321]).unwrap();
        assert_eq!(token.id, 322);
        assert!(token.used);
        assert!(!txn.find::<Token>(&values[0]).unwrap().used);
        txn.rollback();

        assert!(!tables.table::<Token>().unwrap().find(&values[321]).unwrap().used);
    }

    #[test]
    fn test_create_with_unknown_token_inserts_nothing() {
        let mut tables = Tables::new();
        let mut txn = Transaction::begin(&mut tables);
        let result = create_with_token::<User>(&mut txn, "deadbeef", alice());
        assert_eq!(result, Err(ServiceError::InvalidToken));
        assert_eq!(txn.count::<User>(), 0);
    }
}
