use std::fmt;

/// Change annotation of a security versus the previous list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Present in both lists
    #[default]
    Unchanged,
    /// One of the template's status words, e.g. `ADDED` or `DELETED`
    Flagged(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unchanged => "",
            Self::Flagged(word) => word,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the securities list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Fixed-width identifier, kept exactly as extracted (padding included)
    pub cusip_no: String,
    pub has_option: bool,
    pub issuer: String,
    pub status: Status,
}

impl Record {
    /// Renders the record as `CUSIP_NO,OPTION_FLAG,ISSUER,STATUS`.
    ///
    /// Fields are joined as-is: no quoting and no escaping.
    pub fn to_csv_row(&self, separator: &str, option_flag: &str) -> String {
        let flag = if self.has_option { option_flag } else { "" };
        [
            self.cusip_no.as_str(),
            flag,
            self.issuer.as_str(),
            self.status.as_str(),
        ]
        .join(separator)
    }
}
