use rand::Rng;

/// URL-safe alphabet, same 64 symbols nanoid uses
const TOKEN_ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Length of freshly minted tokens
pub const CSRF_TOKEN_LENGTH: usize = 32;

/// Opaque anti-forgery token shared between the `csrf_token` cookie and the
/// value a client echoes back on mutating requests.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Mint a new token from the thread-local CSPRNG
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token: String = (0..CSRF_TOKEN_LENGTH)
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    /// Wrap a token received from a client
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// Never print token values.
impl std::fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}

/// Presence-and-equality check shared by header and form flows.
///
/// Both sides must be present and non-empty. Comparison time does not depend
/// on where the first differing byte is.
pub fn tokens_match(supplied: Option<&str>, stored: Option<&str>) -> bool {
    match (supplied, stored) {
        (Some(supplied), Some(stored)) if !supplied.is_empty() && !stored.is_empty() => {
            constant_time_eq(supplied.as_bytes(), stored.as_bytes())
        }
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
