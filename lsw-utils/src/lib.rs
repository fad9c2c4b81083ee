//! Shared utility functions for LSW crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a month string in "YYYY-MM" format as the first day of that month.
    pub fn parse_month(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")?)
    }

    /// Parse a bare year ("YYYY") as 1 January of that year.
    pub fn parse_year(s: &str) -> anyhow::Result<NaiveDate> {
        if !matches_shape(s, "DDDD") {
            anyhow::bail!("year must be four digits: {s:?}");
        }
        let year: i32 = s.parse()?;
        year_start(year).ok_or_else(|| anyhow::anyhow!("year out of range: {year}"))
    }

    /// 1 January of `year`, if representable.
    pub fn year_start(year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, 1, 1)
    }

    /// `D` in `shape` stands for an ASCII digit, anything else for itself.
    fn matches_shape(s: &str, shape: &str) -> bool {
        s.len() == shape.len()
            && s.bytes().zip(shape.bytes()).all(|(c, want)| match want {
                b'D' => c.is_ascii_digit(),
                _ => c == want,
            })
    }

    /// An ISO time component following the date: "T12:30", "T00:00:00.000Z",
    /// " 12:30:00+02:00".
    fn is_time_suffix(rest: &str) -> bool {
        let Some(time) = rest.strip_prefix(['T', ' ']) else {
            return false;
        };
        time.get(..5).is_some_and(|hm| matches_shape(hm, "DD:DD"))
            && time[5..]
                .bytes()
                .all(|c| c.is_ascii_digit() || matches!(c, b':' | b'.' | b'+' | b'-' | b'Z'))
    }

    /// Parse the calendar dates found in satellite time-series records.
    ///
    /// Accepts "YYYY-MM-DD", "YYYY-MM" and "YYYY" with four-digit, unsigned
    /// years, so every accepted date formats back into the same grammar. A
    /// trailing ISO time component ("2023-05-01T00:00:00") is ignored; any
    /// other trailing text is rejected.
    pub fn parse_calendar_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        let split = trimmed.find(['T', ' ']).unwrap_or(trimmed.len());
        let (date_part, rest) = trimmed.split_at(split);
        if !rest.is_empty() && !is_time_suffix(rest) {
            anyhow::bail!("unrecognised time component: {s:?}");
        }
        if matches_shape(date_part, "DDDD-DD-DD") {
            parse_date(date_part)
        } else if matches_shape(date_part, "DDDD-DD") {
            parse_month(date_part)
        } else if matches_shape(date_part, "DDDD") {
            parse_year(date_part)
        } else {
            anyhow::bail!("unrecognised date: {s:?}")
        }
    }

    /// Label for the month containing `date`, "YYYY-MM".
    pub fn month_label(date: &NaiveDate) -> String {
        date.format("%Y-%m").to_string()
    }

}

/// Number formatting for reports
pub mod numbers {
    /// Square metres per square kilometre.
    pub const M2_PER_KM2: f64 = 1_000_000.0;

    /// Format a surface area given in square metres as square kilometres,
    /// e.g. `973119950.0` -> `"973.12 km²"`.
    pub fn format_area_km2(area_m2: f64) -> String {
        format!("{:.2} km²", area_m2 / M2_PER_KM2)
    }

    /// Format a percentage with an explicit sign, e.g. `-3.456` -> `"-3.46%"`.
    pub fn format_signed_percent(value: f64) -> String {
        format!("{value:+.2}%")
    }

}
