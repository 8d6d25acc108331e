use serde::{Deserialize, Serialize};

/// Stored profile record.
/// Only `Playlist` profiles can be loaded into a catalog; the other kinds are
/// kept so that a profile list written by other clients round-trips intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProfileRecord {
    #[serde(rename_all = "camelCase")]
    Playlist {
        #[serde(default)]
        id: String,
        name: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        epg_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    LiveRemote {
        #[serde(default)]
        id: String,
        name: String,
        server_url: String,
        username: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Portal {
        #[serde(default)]
        id: String,
        name: String,
        portal_url: String,
        mac_address: String,
    },
}

impl ProfileRecord {
    pub fn id(&self) -> &str {
        match self {
            ProfileRecord::Playlist { id, .. }
            | ProfileRecord::LiveRemote { id, .. }
            | ProfileRecord::Portal { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProfileRecord::Playlist { name, .. }
            | ProfileRecord::LiveRemote { name, .. }
            | ProfileRecord::Portal { name, .. } => name,
        }
    }

    pub fn set_id(&mut self, new_id: String) {
        match self {
            ProfileRecord::Playlist { id, .. }
            | ProfileRecord::LiveRemote { id, .. }
            | ProfileRecord::Portal { id, .. } => *id = new_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProfileRecord::Playlist { .. } => "playlist",
            ProfileRecord::LiveRemote { .. } => "liveRemote",
            ProfileRecord::Portal { .. } => "portal",
        }
    }

    /// Playlist URL handed to the fetcher, if this kind has one
    pub fn playlist_url(&self) -> Option<&str> {
        match self {
            ProfileRecord::Playlist { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Profiles response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesResponse {
    pub profiles: Vec<ProfileRecord>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_profile_json() {
        let json = r#"{"kind":"playlist","id":"p1","name":"Home","url":"http://example.com/list.m3u"}"#;
        let profile: ProfileRecord = serde_json::from_str(json).unwrap();

        assert_eq!(profile.id(), "p1");
        assert_eq!(profile.kind(), "playlist");
        assert_eq!(profile.playlist_url(), Some("http://example.com/list.m3u"));
    }

    #[test]
    fn test_live_remote_profile_json() {
        let json = r#"{"kind":"liveRemote","id":"x","name":"Remote","serverUrl":"http://srv:8080","username":"bob"}"#;
        let profile: ProfileRecord = serde_json::from_str(json).unwrap();

        assert_eq!(profile.kind(), "liveRemote");
        assert_eq!(profile.playlist_url(), None);
        match profile {
            ProfileRecord::LiveRemote { password, .. } => assert!(password.is_none()),
            other => panic!("unexpected profile {:?}", other),
        }
    }

    #[test]
    fn test_portal_serializes_camel_case() {
        let profile = ProfileRecord::Portal {
            id: "s".to_string(),
            name: "Portal".to_string(),
            portal_url: "http://portal".to_string(),
            mac_address: "00:1A:79:00:00:01".to_string(),
        };
        let value = serde_json::to_value(&profile).unwrap();

        assert_eq!(value["kind"], "portal");
        assert_eq!(value["portalUrl"], "http://portal");
        assert_eq!(value["macAddress"], "00:1A:79:00:00:01");
    }
}
