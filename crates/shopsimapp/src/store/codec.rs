//! # Record Encoding
//!
//! Records are stored as pretty-printed JSON. Dates never use a numeric or
//! locale form on disk: the [`iso_date`] and [`iso_datetime`] converters are
//! attached to date fields with `#[serde(with = ...)]` and write ISO-8601
//! strings that parse back to the identical value.
//!
//! ```text
//! NaiveDate      2025-03-10
//! NaiveDateTime  2025-03-10T14:05:09.120   (fraction only when non-zero)
//! ```

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize>(record: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<T> {
    Ok(serde_json::from_str(payload)?)
}

pub fn encode_list<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Decodes a collection file. A blank file is an empty collection.
pub fn decode_list<T: DeserializeOwned>(payload: &str) -> Result<Vec<T>> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(payload)?)
}

/// `NaiveDate` as `YYYY-MM-DD`.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}

/// `NaiveDateTime` as `YYYY-MM-DDTHH:MM:SS[.fraction]`.
///
/// Minute-precision values (`YYYY-MM-DDTHH:MM`) are accepted on read; older
/// data files drop the seconds when they are zero.
pub mod iso_datetime {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
    const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, MINUTE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, ProductCategory, PurchasedProduct, Receipt};
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    fn sample_receipt(date_time: NaiveDateTime) -> Receipt {
        let mut product = Product::new(
            "Coffee",
            5.0,
            ProductCategory::Food,
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        );
        product.id = 4;
        product.unit_sale_price = 6.25;
        let mut receipt = Receipt::new(
            1,
            2,
            date_time,
            vec![PurchasedProduct {
                product,
                quantity: 3,
            }],
        );
        receipt.id = 9;
        receipt
    }

    #[test]
    fn dates_are_written_as_iso_strings() {
        let date_time = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        let json = encode(&sample_receipt(date_time)).unwrap();

        assert!(json.contains("\"date_time\": \"2025-03-10T14:05:09\""));
        assert!(json.contains("\"expiration_date\": \"2026-02-28\""));
    }

    #[test]
    fn receipt_round_trips_with_subsecond_time() {
        let date_time = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_nano_opt(14, 5, 9, 123_456_789)
            .unwrap();
        let receipt = sample_receipt(date_time);

        let decoded: Receipt = decode(&encode(&receipt).unwrap()).unwrap();
        assert_eq!(decoded, receipt);
        assert_eq!(decoded.date_time.nanosecond(), 123_456_789);
    }

    #[test]
    fn minute_precision_datetime_is_accepted() {
        let parsed = iso_datetime::parse("2024-12-01T08:30").unwrap();
        assert_eq!(parsed.hour(), 8);
        assert_eq!(parsed.minute(), 30);
        assert_eq!(parsed.second(), 0);
    }

    #[test]
    fn malformed_date_is_a_serialization_error() {
        let json = r#"{
            "id": 1,
            "name": "Milk",
            "unit_purchase_price": 1.0,
            "category": "FOOD",
            "expiration_date": "10/03/2025"
        }"#;
        let result: Result<Product> = decode(json);
        assert!(matches!(
            result,
            Err(crate::error::StoreError::Serialization(_))
        ));
    }

    #[test]
    fn blank_collection_file_decodes_empty() {
        let list: Vec<Product> = decode_list("  \n").unwrap();
        assert!(list.is_empty());
    }
}
