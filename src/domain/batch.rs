//! Stream envelope carrying a batch of normalized quotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quote::NormalizedQuote;

/// One message on the normalized-odds stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBatch {
    /// Ordered quotes produced by the normalizer.
    #[serde(default)]
    pub odds_data: Vec<NormalizedQuote>,
    /// When the batch was emitted.
    pub timestamp: DateTime<Utc>,
    /// Producer-assigned batch identifier.
    #[serde(default)]
    pub batch_id: String,
}

impl QuoteBatch {
    /// Decode a batch from a raw message body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not a valid envelope.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.odds_data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.odds_data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope() {
        let body = br#"{
            "odds_data": [{
                "event_id": "event-1",
                "market": "match_winner",
                "selection": "Home",
                "back_price": "1.80",
                "lay_price": "1.85",
                "back_size": "500",
                "lay_size": "700",
                "timestamp": "2024-05-01T12:00:00Z"
            }],
            "timestamp": "2024-05-01T12:00:02Z",
            "batch_id": "batch-42"
        }"#;

        let batch = QuoteBatch::from_slice(body).unwrap();
        assert_eq!(batch.batch_id, "batch-42");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.odds_data[0].selection, "Home");
    }

    #[test]
    fn rejects_non_envelope_body() {
        assert!(QuoteBatch::from_slice(b"not json").is_err());
        assert!(QuoteBatch::from_slice(br#"{"odds_data": []}"#).is_err());
    }
}
