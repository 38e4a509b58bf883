//! SDK options handed to the wallet provider.
//!
//! Older SDK releases and the current one want differently shaped options.
//! Rather than one provider per release, [`SdkProfile`] picks the shape.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Settings;
use crate::session::sdk::{AddressType, AuthProvider};

/// Path the identity provider redirects back to. Must be allow-listed in the
/// wallet portal.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Hosted login page used by the embedded-provider profile.
pub const EMBEDDED_AUTH_URL: &str = "https://connect.phantom.app/login";

pub const APP_ICON: &str = "/phantom-logo.png";

/// Which SDK release's option shape to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkProfile {
    /// Embedded provider with a hosted login page and a fixed redirect.
    Embedded,
    /// Multi-provider connect modal with theme and branding.
    #[default]
    Connect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Embedded,
    Injected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<Url>,
    pub redirect_url: Url,
}

/// Options passed to [`crate::session::WalletSdk::init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    pub profile: SdkProfile,
    pub app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,
    pub address_types: Vec<AddressType>,
    pub providers: Vec<AuthProvider>,
    pub auth_options: AuthOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_icon: Option<String>,
}

/// Same-origin callback URL: from `origin` when known, else from the
/// configured app URL.
pub fn redirect_url(origin: Option<&Url>, app_url: &Url) -> Url {
    let mut url = origin.unwrap_or(app_url).clone();
    url.set_path(CALLBACK_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url
}

impl SdkProfile {
    /// Build the options for this profile.
    pub fn options(self, settings: &Settings, origin: Option<&Url>) -> ProviderOptions {
        match self {
            SdkProfile::Embedded => ProviderOptions {
                profile: self,
                app_id: settings.app_id().to_string(),
                provider_type: Some(ProviderType::Embedded),
                address_types: vec![AddressType::Solana],
                providers: vec![AuthProvider::Injected],
                auth_options: AuthOptions {
                    auth_url: Url::parse(EMBEDDED_AUTH_URL).ok(),
                    // This release only knew the configured app URL.
                    redirect_url: redirect_url(None, settings.app_url()),
                },
                theme: None,
                app_name: None,
                app_icon: None,
            },
            SdkProfile::Connect => ProviderOptions {
                profile: self,
                app_id: settings.app_id().to_string(),
                provider_type: None,
                address_types: vec![AddressType::Solana],
                providers: AuthProvider::ALL.to_vec(),
                auth_options: AuthOptions {
                    auth_url: None,
                    redirect_url: redirect_url(origin, settings.app_url()),
                },
                theme: Some(Theme::Dark),
                app_name: Some(settings.app_name().to_string()),
                app_icon: Some(APP_ICON.to_string()),
            },
        }
    }
}
