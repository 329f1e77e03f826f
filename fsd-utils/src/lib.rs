//! Shared utility functions for FSD crates.

/// Well-known-text point helpers
pub mod coords {
    use crate::error::PointError;

    /// Parse a `Point(<lon> <lat>)` string into a `(lon, lat)` pair.
    ///
    /// The geometry key reported with each stocking event uses this form,
    /// optionally prefixed with an SRID (`SRID=4326;POINT(-82.1 45.3)`).
    /// The keyword is matched case-insensitively.
    pub fn parse_point(s: &str) -> Result<(f64, f64), PointError> {
        let open = s.find('(').ok_or_else(|| PointError(s.to_string()))?;
        let close = s.rfind(')').ok_or_else(|| PointError(s.to_string()))?;
        if close <= open {
            return Err(PointError(s.to_string()));
        }
        let keyword = s[..open].rsplit(';').next().unwrap_or("").trim();
        if !keyword.eq_ignore_ascii_case("point") {
            return Err(PointError(s.to_string()));
        }
        let mut parts = s[open + 1..close].split_whitespace();
        let lon = parts.next().and_then(|p| p.parse::<f64>().ok());
        let lat = parts.next().and_then(|p| p.parse::<f64>().ok());
        match (lon, lat, parts.next()) {
            (Some(lon), Some(lat), None) => Ok((lon, lat)),
            _ => Err(PointError(s.to_string())),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_point() {
            assert_eq!(parse_point("Point(-82.5 45.25)").unwrap(), (-82.5, 45.25));
            assert_eq!(parse_point("POINT(-79 43.6)").unwrap(), (-79.0, 43.6));
            assert_eq!(
                parse_point("SRID=4326;POINT(-83.1 44.0)").unwrap(),
                (-83.1, 44.0)
            );
        }

        #[test]
        fn test_parse_point_rejects_garbage() {
            assert!(parse_point("").is_err());
            assert!(parse_point("Point(-82.5)").is_err());
            assert!(parse_point("Point(a b)").is_err());
            assert!(parse_point("Point(1 2 3)").is_err());
            assert!(parse_point("LineString(1 2)").is_err());
            assert!(parse_point(")Point(").is_err());
        }
    }
}

/// Number formatting for panels and tables
pub mod format {
    /// Format an integer with comma thousands separators, e.g. `1234567` -> `"1,234,567"`.
    pub fn comma_format(value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if value < 0 {
            out.push('-');
        }
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_comma_format() {
            assert_eq!(comma_format(0), "0");
            assert_eq!(comma_format(999), "999");
            assert_eq!(comma_format(1000), "1,000");
            assert_eq!(comma_format(1234567), "1,234,567");
            assert_eq!(comma_format(-50000), "-50,000");
        }
    }
}

/// Stocking month labels
pub mod months {
    use chrono::Month;

    /// Human label for a stocking month key.
    ///
    /// Month keys are `"1"`..`"12"`; `"0"` marks an unreported month. Anything
    /// else is returned unchanged.
    pub fn month_label(key: &str) -> String {
        match key.trim().parse::<u8>() {
            Ok(0) => "Unknown".to_string(),
            Ok(m) => match Month::try_from(m) {
                Ok(month) => month.name().to_string(),
                Err(_) => key.to_string(),
            },
            Err(_) => key.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_month_label() {
            assert_eq!(month_label("0"), "Unknown");
            assert_eq!(month_label("5"), "May");
            assert_eq!(month_label("12"), "December");
            assert_eq!(month_label("13"), "13");
            assert_eq!(month_label("Unkn"), "Unkn");
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct PointError(pub String);

    impl fmt::Display for PointError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Malformed point: {:?}", self.0)
        }
    }

    impl std::error::Error for PointError {}
}
