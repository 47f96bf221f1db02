//! Canonical query-string form of the job listing filters.
//!
//! Keys are written in a fixed order, multi-valued fields are joined with a
//! literal comma and empty fields never appear. The same string therefore
//! names the same search whichever order the form produced its fields in, and
//! is safe to use as a cache key or as the identity of a pagination chain.

use std::fmt;

use crate::error::ListingError;

/// Reserved separator between the values of a multi-valued field.
pub const SEPARATOR: char = ',';

/// The filter keys understood by the job listing, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Category,
    Location,
    Title,
    Type,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Category,
        FilterField::Location,
        FilterField::Title,
        FilterField::Type,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::Location => "location",
            FilterField::Title => "title",
            FilterField::Type => "type",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// `title` holds a single string, every other field a set.
    pub fn is_multi_valued(self) -> bool {
        !matches!(self, FilterField::Title)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// User-chosen constraints narrowing the job listing.
///
/// Empty strings are never stored, multi-valued fields keep insertion order
/// without duplicates, and no value contains [`SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    title: Option<String>,
    location: Vec<String>,
    category: Vec<String>,
    job_type: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title substring. An empty title clears the constraint.
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self, ListingError> {
        let title = title.into();
        check_value(FilterField::Title, &title)?;
        self.title = (!title.is_empty()).then_some(title);
        Ok(self)
    }

    /// Add values to a multi-valued field. Empty values are skipped.
    pub fn with_values<I, S>(mut self, field: FilterField, values: I) -> Result<Self, ListingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(field, value.into())?;
        }
        Ok(self)
    }

    fn insert(&mut self, field: FilterField, value: String) -> Result<(), ListingError> {
        check_value(field, &value)?;
        if value.is_empty() {
            return Ok(());
        }

        let slot = match field {
            FilterField::Title => {
                self.title = Some(value);
                return Ok(());
            }
            FilterField::Location => &mut self.location,
            FilterField::Category => &mut self.category,
            FilterField::Type => &mut self.job_type,
        };

        if !slot.contains(&value) {
            slot.push(value);
        }
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn location(&self) -> &[String] {
        &self.location
    }

    pub fn category(&self) -> &[String] {
        &self.category
    }

    pub fn job_type(&self) -> &[String] {
        &self.job_type
    }

    /// Values of a field as a slice (zero or one element for `title`).
    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Title => self.title.as_slice(),
            FilterField::Location => &self.location,
            FilterField::Category => &self.category,
            FilterField::Type => &self.job_type,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.values(*f).is_empty())
    }
}

fn check_value(field: FilterField, value: &str) -> Result<(), ListingError> {
    if value.contains(SEPARATOR) {
        return Err(ListingError::validation(format!(
            "value for `{field}` must not contain '{SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Serialise filters into their canonical query string (no leading `?`).
pub fn encode(filters: &FilterSet) -> Result<String, ListingError> {
    let mut pairs = Vec::new();

    for field in FilterField::ALL {
        let values = filters.values(field);
        if values.is_empty() {
            continue;
        }

        let mut encoded = Vec::with_capacity(values.len());
        for value in values {
            check_value(field, value)?;
            encoded.push(urlencoding::encode(value).into_owned());
        }

        let sep = SEPARATOR.to_string();
        pairs.push(format!("{}={}", field.key(), encoded.join(sep.as_str())));
    }

    Ok(pairs.join("&"))
}

/// Parse a query string into filters. Unknown keys are ignored.
pub fn decode(query: &str) -> Result<FilterSet, ListingError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut filters = FilterSet::new();
    let mut single_seen = Vec::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let Some(field) = FilterField::from_key(&decode_component(raw_key)?) else {
            continue;
        };

        let parts: Vec<&str> = raw_value.split(SEPARATOR).collect();
        if !field.is_multi_valued() {
            if parts.len() > 1 || single_seen.contains(&field) {
                return Err(ListingError::validation(format!(
                    "`{field}` takes a single value"
                )));
            }
            single_seen.push(field);
        }

        for part in parts {
            let value = decode_component(part)?;
            filters.insert(field, value)?;
        }
    }

    Ok(filters)
}

fn decode_component(raw: &str) -> Result<String, ListingError> {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|v| v.into_owned())
        .map_err(|e| ListingError::validation(format!("malformed percent-encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn remote_nyc() -> FilterSet {
        FilterSet::new()
            .with_values(FilterField::Location, ["Remote", "NYC"])
            .unwrap()
    }

    #[test]
    fn omits_empty_title() {
        let filters = remote_nyc().with_title("").unwrap();
        assert_eq!(encode(&filters).unwrap(), "location=Remote,NYC");
    }

    #[test]
    fn decodes_without_absent_keys() {
        let filters = decode("location=Remote,NYC").unwrap();
        assert_eq!(filters, remote_nyc());
        assert_eq!(filters.title(), None);
        assert!(filters.category().is_empty());
    }

    #[test]
    fn keys_are_written_in_canonical_order() {
        let filters = FilterSet::new()
            .with_values(FilterField::Type, ["full-time"])
            .unwrap()
            .with_title("rust")
            .unwrap()
            .with_values(FilterField::Category, ["engineering"])
            .unwrap();

        assert_eq!(
            encode(&filters).unwrap(),
            "category=engineering&title=rust&type=full-time"
        );
    }

    #[test]
    fn same_filters_in_any_order_encode_identically() {
        let a = decode("type=remote&title=dev").unwrap();
        let b = decode("title=dev&type=remote").unwrap();
        assert_eq!(encode(&a).unwrap(), encode(&b).unwrap());
    }

    #[test]
    fn round_trips_values_needing_escapes() {
        let filters = FilterSet::new()
            .with_title("C++ & Rust dev")
            .unwrap()
            .with_values(FilterField::Location, ["New York", "São Paulo"])
            .unwrap();

        let encoded = encode(&filters).unwrap();
        assert_eq!(decode(&encoded).unwrap(), filters);
    }

    #[test]
    fn ignores_unknown_keys_and_empty_pairs() {
        let filters = decode("?cursor=abc&&type=remote&sort=jobs&limit=5").unwrap();
        assert_eq!(
            filters,
            FilterSet::new()
                .with_values(FilterField::Type, ["remote"])
                .unwrap()
        );
    }

    #[test]
    fn empty_values_impose_no_constraint() {
        let filters = decode("title=&location=&category=,").unwrap();
        assert!(filters.is_empty());
        assert_eq!(encode(&filters).unwrap(), "");
    }

    #[test]
    fn rejects_separator_inside_values() {
        assert!(matches!(
            FilterSet::new().with_values(FilterField::Location, ["Berlin, DE"]),
            Err(ListingError::Validation(_))
        ));
        assert!(matches!(
            FilterSet::new().with_title("a,b"),
            Err(ListingError::Validation(_))
        ));
        assert!(matches!(
            decode("location=Berlin%2C%20DE"),
            Err(ListingError::Validation(_))
        ));
        assert!(matches!(decode("title=a,b"), Err(ListingError::Validation(_))));
    }

    #[test]
    fn plus_decodes_as_space() {
        let filters = decode("title=senior+engineer").unwrap();
        assert_eq!(filters.title(), Some("senior engineer"));
    }

    #[test]
    fn duplicate_values_collapse() {
        let filters = decode("type=remote,remote&type=remote").unwrap();
        assert_eq!(filters.job_type(), ["remote".to_string()]);
    }

    #[test]
    fn repeated_title_key_is_rejected() {
        assert!(matches!(
            decode("title=rust&title=go"),
            Err(ListingError::Validation(_))
        ));
        assert!(matches!(
            decode("title=&title=go"),
            Err(ListingError::Validation(_))
        ));
        // Multi-valued keys may repeat and accumulate.
        let filters = decode("type=remote&type=contract").unwrap();
        assert_eq!(filters.job_type(), ["remote", "contract"]);
    }

    fn value() -> impl Strategy<Value = String> {
        "[^,]{1,12}"
    }

    fn values() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(value(), 0..4)
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            title in "[^,]{0,16}",
            location in values(),
            category in values(),
            job_type in values(),
        ) {
            let filters = FilterSet::new()
                .with_title(title)?
                .with_values(FilterField::Location, location)?
                .with_values(FilterField::Category, category)?
                .with_values(FilterField::Type, job_type)?;

            let encoded = encode(&filters)?;
            prop_assert_eq!(decode(&encoded)?, filters);
        }
    }
}
