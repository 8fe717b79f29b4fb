/// Price columns a bar file must provide (volume is optional)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OhlcColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl OhlcColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    /// Common alternative column names
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Open => &["open", "Open", "OPEN", "o"],
            Self::High => &["high", "High", "HIGH", "h"],
            Self::Low => &["low", "Low", "LOW", "l"],
            Self::Close => &["close", "Close", "CLOSE", "c"],
            Self::Volume => &["volume", "Volume", "VOLUME", "vol", "Vol", "v"],
        }
    }
}

/// Resolved column names of a bar DataFrame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: Option<String>,
}
