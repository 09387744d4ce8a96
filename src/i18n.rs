//! Tray menu and tooltip labels

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Tooltip,
    StartOnLogin,
    ShowPercentage,
    Language,
    ShowHide,
    Exit,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Chinese];

    /// Name of the language in itself, for the language submenu
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "中文",
        }
    }

    pub fn tr(self, label: Label) -> &'static str {
        match (self, label) {
            (Language::English, Label::Tooltip) => "Network traffic monitor",
            (Language::English, Label::StartOnLogin) => "Start on login",
            (Language::English, Label::ShowPercentage) => "Show percentage",
            (Language::English, Label::Language) => "Language",
            (Language::English, Label::ShowHide) => "Show/Hide",
            (Language::English, Label::Exit) => "Exit",
            (Language::Chinese, Label::Tooltip) => "网络流量监控",
            (Language::Chinese, Label::StartOnLogin) => "开机自启动",
            (Language::Chinese, Label::ShowPercentage) => "显示百分比",
            (Language::Chinese, Label::Language) => "语言",
            (Language::Chinese, Label::ShowHide) => "显示/隐藏",
            (Language::Chinese, Label::Exit) => "退出",
        }
    }
}
