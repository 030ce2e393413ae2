//! Signed double-submit CSRF tokens
//!
//! A token is `<nonce>.<signature>` where the nonce is 16 random bytes and the
//! signature is HMAC-SHA256 of the nonce under the application secret, both
//! hex encoded. The token travels in the `csrftoken` cookie and in the hidden
//! `csrf_token` input; a submission is accepted only when the cookie token is
//! correctly signed and the two copies are equal.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the token
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

const NONCE_LEN: usize = 16;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsrfError {
	#[error("CSRF secret key must not be empty")]
	EmptySecret,
	#[error("CSRF token is malformed")]
	Malformed,
	#[error("CSRF token signature is invalid")]
	BadSignature,
}

/// Issues and checks CSRF tokens for one secret key
#[derive(Clone)]
pub struct CsrfValidator {
	mac: HmacSha256,
}

impl std::fmt::Debug for CsrfValidator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CsrfValidator").finish_non_exhaustive()
	}
}

impl CsrfValidator {
	/// Create a validator for `secret`
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::{CsrfError, CsrfValidator};
	///
	/// let validator = CsrfValidator::new("s3cr3t").unwrap();
	/// let token = validator.generate();
	/// assert!(validator.verify(&token).is_ok());
	///
	/// assert_eq!(CsrfValidator::new("").unwrap_err(), CsrfError::EmptySecret);
	/// ```
	pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, CsrfError> {
		let secret = secret.as_ref();
		if secret.is_empty() {
			return Err(CsrfError::EmptySecret);
		}
		let mac = HmacSha256::new_from_slice(secret).map_err(|_| CsrfError::EmptySecret)?;
		Ok(Self { mac })
	}

	/// Issue a fresh signed token
	pub fn generate(&self) -> String {
		let mut nonce = [0u8; NONCE_LEN];
		rand::thread_rng().fill_bytes(&mut nonce);
		let nonce_hex = hex::encode(nonce);
		format!("{}.{}", nonce_hex, hex::encode(self.sign(&nonce_hex)))
	}

	fn sign(&self, nonce_hex: &str) -> Vec<u8> {
		let mut mac = self.mac.clone();
		mac.update(nonce_hex.as_bytes());
		mac.finalize().into_bytes().to_vec()
	}

	/// Check that `token` was issued under this secret
	pub fn verify(&self, token: &str) -> Result<(), CsrfError> {
		let (nonce_hex, signature_hex) = token.split_once('.').ok_or(CsrfError::Malformed)?;
		if nonce_hex.len() != NONCE_LEN * 2 || hex::decode(nonce_hex).is_err() {
			return Err(CsrfError::Malformed);
		}
		let signature = hex::decode(signature_hex).map_err(|_| CsrfError::Malformed)?;

		let mut mac = self.mac.clone();
		mac.update(nonce_hex.as_bytes());
		mac.verify_slice(&signature)
			.map_err(|_| CsrfError::BadSignature)
	}

	/// `Set-Cookie` value storing `token`
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::CsrfValidator;
	///
	/// assert_eq!(
	///     CsrfValidator::cookie_header("abc"),
	///     "csrftoken=abc; HttpOnly; SameSite=Lax; Path=/"
	/// );
	/// ```
	pub fn cookie_header(token: &str) -> String {
		format!("{}={}; HttpOnly; SameSite=Lax; Path=/", CSRF_COOKIE_NAME, token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn validator() -> CsrfValidator {
		CsrfValidator::new("test-secret").unwrap()
	}

	#[rstest]
	fn test_generated_tokens_are_unique_and_valid(validator: CsrfValidator) {
		// Act
		let first = validator.generate();
		let second = validator.generate();

		// Assert
		assert_ne!(first, second);
		assert!(validator.verify(&first).is_ok());
		assert!(validator.verify(&second).is_ok());
	}

	#[rstest]
	fn test_token_from_other_secret_is_rejected(validator: CsrfValidator) {
		let other = CsrfValidator::new("other-secret").unwrap();

		let token = other.generate();

		assert_eq!(validator.verify(&token), Err(CsrfError::BadSignature));
	}

	#[rstest]
	fn test_tampered_nonce_is_rejected(validator: CsrfValidator) {
		let token = validator.generate();
		let (_, signature) = token.split_once('.').unwrap();
		let forged = format!("{}.{}", "0".repeat(NONCE_LEN * 2), signature);

		assert_eq!(validator.verify(&forged), Err(CsrfError::BadSignature));
	}

	#[rstest]
	#[case("")]
	#[case("no-dot")]
	#[case("abcd.ef")]
	#[case("zz.zz")]
	fn test_malformed_tokens(validator: CsrfValidator, #[case] token: &str) {
		assert_eq!(validator.verify(token), Err(CsrfError::Malformed));
	}
}
