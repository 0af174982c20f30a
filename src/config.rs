//! Static configuration for the backend services.
//!
//! The live app ships these values baked in; none of them are documented by
//! the operator. They are modeled as one explicit [`Config`] value threaded
//! through client and session construction instead of process-wide mutable
//! globals, so tests and alternate deployments can override every endpoint,
//! credential, and sentinel without touching shared state.

use std::path::PathBuf;

/// Canned subject lines the contact endpoint recognizes.
pub const CONTACT_REASONS: [&str; 9] = [
    "My Basecamp location is wrong.",
    "I'm not near a high school but it says I am! Help!",
    "I want my college to be a Peek location!",
    "I have a really cool idea for the app.",
    "Yik Yak isn't working properly on my phone.",
    "Someone posted something and I want it taken down.",
    "My Yakarma has been reset.",
    "I forgot my pin code.",
    "Other",
];

/// Device identity strings composed into the main-API user agent.
///
/// The user agent doubles as request-authentication input: the per-request
/// `token` parameter is derived from it, so changing any of these changes
/// the token as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Runtime name, e.g. `Dalvik`.
    pub vm_type: String,
    /// Runtime version, e.g. `2.1.0`.
    pub vm_version: String,
    /// Android OS version, e.g. `5.1`.
    pub android_version: String,
    /// Device model string.
    pub model: String,
    /// Firmware build tag.
    pub build: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            vm_type: "Dalvik".into(),
            vm_version: "2.1.0".into(),
            android_version: "5.1".into(),
            model: "Android SDK built for x86".into(),
            build: "LKY45".into(),
        }
    }
}

impl DeviceIdentity {
    /// Render the Android-style user agent, optionally with the app version
    /// appended. The token derivation uses the version-less form.
    pub(crate) fn user_agent(&self, app_version: Option<&str>) -> String {
        let base = format!(
            "{}/{} (Linux; U; Android {}; {} Build/{})",
            self.vm_type, self.vm_version, self.android_version, self.model, self.build
        );
        match app_version {
            Some(version) => format!("{base} {version}"),
            None => base,
        }
    }
}

/// Endpoint URLs, credentials, and contract constants for the backends.
///
/// All fields are public and the type implements `Default` with the values
/// observed in the live app, so overriding a subset is a struct-update
/// one-liner:
///
/// ```
/// use yakkit::Config;
///
/// let config = Config {
///     main_url: "http://localhost:8080/api/".into(),
///     ..Config::default()
/// };
/// assert_eq!(config.app_version, "2.7.3");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Main API base, trailing slash required for URL joining.
    pub main_url: String,
    /// Basecamp service base (save-basecamp lives here, not on the main API).
    pub basecamp_url: String,
    /// Notification service base.
    pub notify_url: String,
    /// Install (registration stage one) service base.
    pub install_url: String,

    /// HMAC key for signing main-API requests.
    pub api_key: String,
    /// App version reported in the `version` parameter and the user agent.
    pub app_version: String,
    /// Single-letter version suffix, appended to [`Self::app_version`].
    pub app_version_letter: String,

    /// Install-service application ID. When `None`, the install stage of
    /// registration is skipped entirely.
    pub install_app_id: Option<String>,
    /// Install-service client key. When `None`, the install stage of
    /// registration is skipped entirely.
    pub install_client_key: Option<String>,
    /// Install SDK version string.
    pub install_version: String,
    /// Single-letter version prefix for the install `v` parameter.
    pub install_version_letter: String,
    /// Install SDK build number.
    pub install_build: String,
    /// Android API level reported to the install service.
    pub install_api_level: String,

    /// Device identity composed into user agents and the request token.
    pub device: DeviceIdentity,

    /// Sentinel message ID meaning "no user content in this area".
    ///
    /// Contract value from the live backend; cannot be derived, only observed.
    pub no_yaks_id: String,
    /// Sentinel message ID meaning "too close to a restricted zone".
    ///
    /// Contract value from the live backend; cannot be derived, only observed.
    pub too_close_id: String,

    /// When set, every freshly generated user ID is appended to this file,
    /// one per line. Identities are otherwise unrecoverable once dropped.
    pub identity_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_url: "https://us-central-api.yikyakapi.net/api/".into(),
            basecamp_url: "https://bc.yikyakapi.net/api/".into(),
            notify_url: "https://notify.yikyakapi.net/api/".into(),
            install_url: "https://api.parse.com/2/".into(),

            api_key: "EF64523D2BD1FA21F18F5BC654DFC41B".into(),
            app_version: "2.7.3".into(),
            app_version_letter: "e".into(),

            install_app_id: Some("wMkdjBI4ircsNcRn8mXnBkgH0dwOcrkexrdMY3vY".into()),
            install_client_key: Some("GbNFwvFgoUu1wYuwIexNImy8bnSlNhqssG7gd53Y".into()),
            install_version: "1.7.1".into(),
            install_version_letter: "a".into(),
            install_build: "59".into(),
            install_api_level: "22".into(),

            device: DeviceIdentity::default(),

            no_yaks_id: "Y/b3c6c56b0305f2bc794e40b504f7150f".into(),
            too_close_id: "Y/1687dcbe8ca5a308d46c44343a4c69eb".into(),

            identity_log: None,
        }
    }
}

impl Config {
    /// Full app version string as reported on the wire, e.g. `2.7.3e`.
    pub fn version_string(&self) -> String {
        format!("{}{}", self.app_version, self.app_version_letter)
    }

    /// Whether both install-service credentials are present.
    pub(crate) fn has_install_credentials(&self) -> bool {
        self.install_app_id.is_some() && self.install_client_key.is_some()
    }
}
