//! Account id rules.

use crate::errors::CoreError;

const MIN_ACCOUNT_ID_LEN: usize = 2;
const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Checks an account id against the network's naming rules.
///
/// Ids are 2 to 64 characters of lowercase letters and digits, split into
/// parts by single `-`, `_` or `.` separators.
pub fn validate_account_id(account_id: &str) -> Result<(), CoreError> {
    let invalid = |reason| CoreError::InvalidAccountId {
        account_id: account_id.to_string(),
        reason,
    };

    if account_id.len() < MIN_ACCOUNT_ID_LEN {
        return Err(invalid("too short"));
    }
    if account_id.len() > MAX_ACCOUNT_ID_LEN {
        return Err(invalid("too long"));
    }

    let mut last_was_separator = true;
    for c in account_id.chars() {
        match c {
            'a'..='z' | '0'..='9' => last_was_separator = false,
            '-' | '_' | '.' => {
                if last_was_separator {
                    return Err(invalid("separators must sit between alphanumerics"));
                }
                last_was_separator = true;
            }
            _ => return Err(invalid("only lowercase alphanumerics and - _ . are allowed")),
        }
    }
    if last_was_separator {
        return Err(invalid("separators must sit between alphanumerics"));
    }

    Ok(())
}
