//! Stage one of registration: the install service.
//!
//! A fresh identity is announced to the backend in two stages. This module
//! covers the first: create an "installation" record on the install service
//! and attach the new user ID to its channel list. Stage two
//! (`registerUser` on the main API) lives with the session.
//!
//! The service's request envelope mirrors the mobile SDK it was
//! reverse-engineered from; the app credentials ride along as headers.

use serde_json::json;

use crate::client::YakHttpClient;
use crate::errors::{RegistrationError, Result};
use crate::util::{check_http_status, json_body};

/// Register `user_id` with the install service. Returns the installation ID
/// and the server-assigned object ID.
pub(crate) fn register(client: &YakHttpClient, user_id: &str) -> Result<(String, String)> {
    let installation_id = uuid::Uuid::new_v4().to_string();

    let object_id = create_installation(client, &installation_id)?;
    save_user(client, user_id, &installation_id, &object_id)?;

    tracing::debug!(%installation_id, %object_id, "install-service registration complete");
    Ok((installation_id, object_id))
}

fn create_installation(client: &YakHttpClient, installation_id: &str) -> Result<String> {
    let config = client.config();
    let data = json!({
        "deviceType": "android",
        "appVersion": config.app_version,
        "parseVersion": config.install_version,
        "appName": "Yik Yak",
        "timeZone": "UTC",
        "installationId": installation_id,
        "appIdentifier": "com.yik.yak",
    });

    let raw = send(client, "create", data, installation_id)?;
    raw.pointer("/result/data/objectId")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            RegistrationError::Install {
                message: raw.to_string(),
            }
            .into()
        })
}

fn save_user(
    client: &YakHttpClient,
    user_id: &str,
    installation_id: &str,
    object_id: &str,
) -> Result<()> {
    // The service expects the user ID wrapped in a 'c' on either side.
    let channel = format!("c{user_id}c");
    let data = json!({
        "channels": {"objects": [channel.as_str()], "__op": "AddUnique"},
        "objectId": object_id,
    });

    let raw = send(client, "update", data, installation_id)?;
    let confirmed = raw
        .pointer("/result/data/channels/0")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|echoed| echoed == channel);

    if confirmed {
        Ok(())
    } else {
        Err(RegistrationError::SaveUser {
            message: raw.to_string(),
        }
        .into())
    }
}

fn send(
    client: &YakHttpClient,
    method: &str,
    data: serde_json::Value,
    installation_id: &str,
) -> Result<serde_json::Value> {
    let config = client.config();
    let body = json!({
        "classname": "_Installation",
        "data": data,
        "osVersion": config.device.android_version,
        "appBuildVersion": config.install_build,
        "appDisplayVersion": config.app_version,
        "v": format!("{}{}", config.install_version_letter, config.install_version),
        "iid": installation_id,
        "uuid": uuid::Uuid::new_v4().to_string(),
    });

    let url = client.install.join(method)?;
    let user_agent = format!(
        "Parse Android SDK {} (com.yik.yak/{}) API Level {}",
        config.install_version, config.install_build, config.install_api_level
    );

    let mut request = client
        .http
        .post(url)
        .json(&body)
        .header(reqwest::header::USER_AGENT, user_agent)
        .header(reqwest::header::ACCEPT_ENCODING, "gzip");
    if let (Some(app_id), Some(client_key)) =
        (&config.install_app_id, &config.install_client_key)
    {
        request = request
            .header("X-Parse-Application-Id", app_id)
            .header("X-Parse-Client-Key", client_key);
    }

    let response = check_http_status(request.send()?)?;
    json_body(response)
}
