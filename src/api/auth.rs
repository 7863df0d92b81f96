//! Authentication endpoint bindings and their payload types.
//!
//! Every binding resolves to the raw [`ApiResponse`] so hosts can drive their
//! notification UI from the envelope's success flag and message. The only local side
//! effects are on the gateway's [`SessionStore`](crate::session::SessionStore):
//! [`login`](Gateway::login) records the returned profile and
//! [`logout`](Gateway::logout) clears it.

// self
use crate::{
	_prelude::*,
	api::{ApiRequest, ApiResponse, routes},
	gateway::Gateway,
	http::GatewayTransport,
};

/// Credentials submitted to the login endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}

/// Registration payload for the signup endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupRequest {
	/// Display name of the new account.
	pub fullname: String,
	/// Unique username.
	pub username: String,
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}

/// Payload requesting a password-reset email.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordResetRequest {
	/// Email address to send the reset link to.
	pub email: String,
}

/// Payload validating a password-reset token before showing the reset form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetTokenValidation {
	/// Reset code extracted from the emailed link.
	pub code: String,
}

/// Payload completing a password reset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordResetConfirmation {
	/// Reset token extracted from the emailed link.
	pub token: String,
	/// Replacement password.
	pub new_password: String,
}

/// Payload confirming an email address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailVerification {
	/// Verification token extracted from the emailed link.
	pub token: String,
}

/// Payload requesting a fresh verification email.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationResend {
	/// Email address to resend the verification link to.
	pub email: String,
}

/// User profile returned by the login endpoint and held by the session store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Unique user identifier.
	pub id: String,
	/// Display name.
	pub fullname: String,
	/// Account email address.
	pub email: String,
}

impl<T> Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Signs in with `credentials`, storing the returned profile on success.
	pub async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse> {
		let response = self.send(ApiRequest::post_json(routes::AUTH_LOGIN, credentials)?).await?;

		if response.success() {
			let profile: UserProfile = response.data_as()?;

			self.session.sign_in(profile);
		}

		Ok(response)
	}

	/// Registers a new account.
	pub async fn signup(&self, registration: &SignupRequest) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::AUTH_SIGNUP, registration)?).await
	}

	/// Requests a password-reset email.
	pub async fn request_password_reset(
		&self,
		request: &PasswordResetRequest,
	) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::AUTH_REQUEST_RESET_PASSWORD, request)?).await
	}

	/// Validates a password-reset token before presenting the reset form.
	pub async fn validate_reset_password_token(
		&self,
		validation: &ResetTokenValidation,
	) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::AUTH_VALIDATE_RESET_PASSWORD_TOKEN, validation)?)
			.await
	}

	/// Completes a password reset.
	pub async fn confirm_password_reset(
		&self,
		confirmation: &PasswordResetConfirmation,
	) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::AUTH_CONFIRM_RESET_PASSWORD, confirmation)?).await
	}

	/// Confirms an email address.
	pub async fn verify_email(&self, verification: &EmailVerification) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::AUTH_VERIFY_EMAIL, verification)?).await
	}

	/// Requests a fresh verification email.
	pub async fn resend_verification_email(
		&self,
		resend: &VerificationResend,
	) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::AUTH_RESEND_VERIFICATION_EMAIL, resend)?).await
	}

	/// Signs out, clearing the local session once the remote call resolves.
	pub async fn logout(&self) -> Result<ApiResponse> {
		let response = self.send(ApiRequest::post(routes::AUTH_LOGOUT)).await?;

		self.session.clear();

		Ok(response)
	}
}
