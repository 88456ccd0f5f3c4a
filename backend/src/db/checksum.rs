//! Checksum calculation for dataset deduplication.

use sha2::{Digest, Sha256};

use super::repository::RepositoryResult;
use crate::models::RankRecord;

/// Calculate SHA-256 checksum of some content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Checksum of a record set over its wire form. Record order matters.
pub fn dataset_checksum(records: &[RankRecord]) -> RepositoryResult<String> {
    let content = serde_json::to_string(records)?;
    Ok(calculate_checksum(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceClass, HourlyRanks};

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"test": "data"}"#;
        let checksum1 = calculate_checksum(content);
        let checksum2 = calculate_checksum(content);
        assert_eq!(checksum1, checksum2);
        assert_eq!(checksum1.len(), 64);
    }

    #[test]
    fn test_dataset_checksum_tracks_content() {
        let a = RankRecord::new(
            "k",
            DeviceClass::Desktop,
            "A",
            HourlyRanks::from_observations(&[(1, 2.0)]),
        );
        let b = RankRecord::new(
            "k",
            DeviceClass::Desktop,
            "A",
            HourlyRanks::from_observations(&[(1, 3.0)]),
        );
        let same = dataset_checksum(&[a.clone()]).unwrap();
        assert_eq!(same, dataset_checksum(&[a.clone()]).unwrap());
        assert_ne!(same, dataset_checksum(&[b.clone()]).unwrap());
        assert_ne!(
            dataset_checksum(&[a.clone(), b.clone()]).unwrap(),
            dataset_checksum(&[b, a]).unwrap()
        );
    }
}
