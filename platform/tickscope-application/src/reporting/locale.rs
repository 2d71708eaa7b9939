use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ReportLocale {
    #[default]
    #[serde(rename = "en", alias = "english", alias = "en_us")]
    English,
    #[serde(rename = "zh", alias = "chinese", alias = "zh_cn")]
    Chinese,
}

impl ReportLocale {
    pub fn parse(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        let base = normalized.split('.').next().unwrap_or_default();
        match base {
            "en" | "en_us" | "en_gb" | "english" => Ok(ReportLocale::English),
            "zh" | "zh_cn" | "zh_hans" | "chinese" => Ok(ReportLocale::Chinese),
            _ => Err(format!("unsupported locale: {value} (expected en | zh)")),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ReportLocale::English => "en",
            ReportLocale::Chinese => "zh",
        }
    }

    /// Divisor applied to volume and amount sums before printing.
    pub fn magnitude(&self) -> Magnitude {
        match self {
            ReportLocale::English => Magnitude {
                divisor: 1_000.0,
                volume_unit: "K lots",
                amount_unit: "K",
            },
            ReportLocale::Chinese => Magnitude {
                divisor: 10_000.0,
                volume_unit: "万手",
                amount_unit: "万元",
            },
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            ReportLocale::English => &ENGLISH,
            ReportLocale::Chinese => &CHINESE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnitude {
    pub divisor: f64,
    pub volume_unit: &'static str,
    pub amount_unit: &'static str,
}

#[derive(Debug)]
pub struct Labels {
    pub security: &'static str,
    pub window: &'static str,
    pub whole_session: &'static str,
    pub pages: &'static str,
    pub ticks: &'static str,
    pub metric: &'static str,
    pub buy: &'static str,
    pub sell: &'static str,
    pub count: &'static str,
    pub avg_price: &'static str,
    pub max_price: &'static str,
    pub min_price: &'static str,
    pub per_share_price: &'static str,
    pub total_volume: &'static str,
    pub avg_volume: &'static str,
    pub max_volume: &'static str,
    pub min_volume: &'static str,
    pub total_amount: &'static str,
    pub avg_amount: &'static str,
    pub max_amount: &'static str,
    pub min_amount: &'static str,
    pub last_time: &'static str,
    pub last_price: &'static str,
    pub last_volume: &'static str,
    pub not_available: &'static str,
    pub skipped_records: &'static str,
    pub incomplete: &'static str,
}

static ENGLISH: Labels = Labels {
    security: "Security",
    window: "Window",
    whole_session: "whole session",
    pages: "pages",
    ticks: "ticks",
    metric: "Metric",
    buy: "Buy",
    sell: "Sell",
    count: "Count",
    avg_price: "Avg Price",
    max_price: "Max Price",
    min_price: "Min Price",
    per_share_price: "Avg Price per Share",
    total_volume: "Total Volume",
    avg_volume: "Avg Volume",
    max_volume: "Max Volume",
    min_volume: "Min Volume",
    total_amount: "Total Amount",
    avg_amount: "Avg Amount",
    max_amount: "Max Amount",
    min_amount: "Min Amount",
    last_time: "Last Trade Time",
    last_price: "Last Trade Price",
    last_volume: "Last Trade Volume",
    not_available: "n/a",
    skipped_records: "Skipped malformed records",
    incomplete: "Warning: data incomplete, stopped at page",
};

static CHINESE: Labels = Labels {
    security: "证券代码",
    window: "时间段",
    whole_session: "全天",
    pages: "页",
    ticks: "笔",
    metric: "指标",
    buy: "买盘",
    sell: "卖盘",
    count: "笔数",
    avg_price: "均价",
    max_price: "最高价",
    min_price: "最低价",
    per_share_price: "成交均价",
    total_volume: "总成交量",
    avg_volume: "平均成交量",
    max_volume: "最大成交量",
    min_volume: "最小成交量",
    total_amount: "总成交额",
    avg_amount: "平均成交额",
    max_amount: "最大成交额",
    min_amount: "最小成交额",
    last_time: "最近成交时间",
    last_price: "最近成交价",
    last_volume: "最近成交量",
    not_available: "无",
    skipped_records: "跳过的异常记录",
    incomplete: "警告: 数据不完整, 停止于页",
};
