use crate::github::ReleaseAsset;
use crate::platform::PlatformKey;

/// Trait for selecting an asset from a list of available assets
pub trait AssetPicker: Send + Sync {
    /// Pick the asset to download from the given list
    ///
    /// Returns `None` if no suitable asset is found
    fn pick<'a>(&self, assets: &'a [ReleaseAsset]) -> Option<&'a ReleaseAsset>;
}

/// Picks the first asset named for the given platform.
///
/// A name matches when it contains the OS token (ignoring ASCII case),
/// contains the architecture token as a whole token, and ends with the
/// archive suffix. A whole token is bounded on both sides by the ends of the
/// name or by non-alphanumeric characters, so `64` does not match inside
/// `arm64` while `arm64-v8a` still matches `app-macos-arm64-v8a.zip`.
pub struct PlatformAssetPicker {
    platform: PlatformKey,
    suffix: String,
}

impl PlatformAssetPicker {
    pub fn new(platform: PlatformKey) -> Self {
        Self::with_suffix(platform, ".zip")
    }

    pub fn with_suffix(platform: PlatformKey, suffix: impl Into<String>) -> Self {
        Self {
            platform,
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn matches(&self, name: &str) -> bool {
        if !name.ends_with(&self.suffix) {
            return false;
        }

        let os_match = name
            .to_ascii_lowercase()
            .contains(&self.platform.os.to_ascii_lowercase());
        os_match && contains_token(name, &self.platform.arch)
    }
}

impl AssetPicker for PlatformAssetPicker {
    fn pick<'a>(&self, assets: &'a [ReleaseAsset]) -> Option<&'a ReleaseAsset> {
        assets.iter().find(|a| self.matches(&a.name))
    }
}

/// Whether `token` occurs in `name` with no alphanumeric character directly
/// before or after it.
fn contains_token(name: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let is_boundary = |c: Option<char>| c.is_none_or(|c| !c.is_ascii_alphanumeric());
    name.match_indices(token).any(|(start, _)| {
        let before = name[..start].chars().next_back();
        let after = name[start + token.len()..].chars().next();
        is_boundary(before) && is_boundary(after)
    })
}
