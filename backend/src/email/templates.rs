//! Email templates

/// Verification email sent at registration, carrying the signed token in a
/// clickable link plus a copy-paste fallback URL.
pub struct VerificationEmail {
    verify_url: String,
}

impl VerificationEmail {
    /// Build the template for a verification link
    ///
    /// `base_url` comes from configuration; the token is appended as a path
    /// segment, matching the `GET /auth/verify/:token` route.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            verify_url: format!("{}/auth/verify/{}", base_url.trim_end_matches('/'), token),
        }
    }

    pub fn subject(&self) -> &'static str {
        "Email Verification"
    }

    pub fn html_body(&self) -> String {
        format!(
            r#"<div style="text-align: center; padding: 20px; font-family: Arial, sans-serif;">
  <h2>Verify Your Email</h2>
  <p>Thank you for signing up! Click the button below to verify your email.</p>
  <a href="{url}"
    style="display: inline-block; padding: 10px 20px; font-size: 16px; color: #ffffff;
           background: #007bff; text-decoration: none; border-radius: 5px;">
    Verify Email
  </a>
  <p>If the button above does not work, copy and paste this URL into your browser:</p>
  <p><a href="{url}">{url}</a></p>
  <p style="color: #777; font-size: 12px;">If you did not request this, please ignore this email.</p>
</div>"#,
            url = self.verify_url
        )
    }

    pub fn text_body(&self) -> String {
        format!(
            "Thank you for signing up! Open this URL to verify your email:\n\n{}\n\n\
             If you did not request this, please ignore this email.",
            self.verify_url
        )
    }
}
