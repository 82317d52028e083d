//! Printer settings models
//!
//! Model and label identifiers use the same string spellings the mobile
//! app persisted (`QL_820NWB`, `DieCutW17H54`, ...) so a settings file
//! written by either side stays readable.

use serde::{Deserialize, Serialize};

/// Supported Brother QL models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrinterModel {
    #[default]
    #[serde(rename = "QL_820NWB")]
    Ql820Nwb,
    #[serde(rename = "QL_810W")]
    Ql810W,
    #[serde(rename = "QL_800")]
    Ql800,
    #[serde(rename = "QL_1110NWB")]
    Ql1110Nwb,
    #[serde(rename = "QL_1100")]
    Ql1100,
}

impl PrinterModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrinterModel::Ql820Nwb => "QL_820NWB",
            PrinterModel::Ql810W => "QL_810W",
            PrinterModel::Ql800 => "QL_800",
            PrinterModel::Ql1110Nwb => "QL_1110NWB",
            PrinterModel::Ql1100 => "QL_1100",
        }
    }
}

impl std::str::FromStr for PrinterModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QL_820NWB" => Ok(PrinterModel::Ql820Nwb),
            "QL_810W" => Ok(PrinterModel::Ql810W),
            "QL_800" => Ok(PrinterModel::Ql800),
            "QL_1110NWB" => Ok(PrinterModel::Ql1110Nwb),
            "QL_1100" => Ok(PrinterModel::Ql1100),
            other => Err(format!("Unknown printer model: {}", other)),
        }
    }
}

impl std::fmt::Display for PrinterModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label media loaded in the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelSize {
    #[default]
    DieCutW17H54,
    DieCutW17H87,
    DieCutW23H23,
    DieCutW29H42,
    DieCutW29H90,
    DieCutW38H90,
    DieCutW39H48,
    DieCutW52H29,
    DieCutW62H29,
    DieCutW62H100,
    DieCutW60H86,
    DieCutW54H29,
    DieCutW102H51,
    DieCutW102H152,
    DieCutW103H164,
    RollW12,
    RollW29,
    RollW38,
    RollW50,
    RollW54,
    RollW62,
    RollW62RB,
    RollW102,
    RollW103,
}

impl LabelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSize::DieCutW17H54 => "DieCutW17H54",
            LabelSize::DieCutW17H87 => "DieCutW17H87",
            LabelSize::DieCutW23H23 => "DieCutW23H23",
            LabelSize::DieCutW29H42 => "DieCutW29H42",
            LabelSize::DieCutW29H90 => "DieCutW29H90",
            LabelSize::DieCutW38H90 => "DieCutW38H90",
            LabelSize::DieCutW39H48 => "DieCutW39H48",
            LabelSize::DieCutW52H29 => "DieCutW52H29",
            LabelSize::DieCutW62H29 => "DieCutW62H29",
            LabelSize::DieCutW62H100 => "DieCutW62H100",
            LabelSize::DieCutW60H86 => "DieCutW60H86",
            LabelSize::DieCutW54H29 => "DieCutW54H29",
            LabelSize::DieCutW102H51 => "DieCutW102H51",
            LabelSize::DieCutW102H152 => "DieCutW102H152",
            LabelSize::DieCutW103H164 => "DieCutW103H164",
            LabelSize::RollW12 => "RollW12",
            LabelSize::RollW29 => "RollW29",
            LabelSize::RollW38 => "RollW38",
            LabelSize::RollW50 => "RollW50",
            LabelSize::RollW54 => "RollW54",
            LabelSize::RollW62 => "RollW62",
            LabelSize::RollW62RB => "RollW62RB",
            LabelSize::RollW102 => "RollW102",
            LabelSize::RollW103 => "RollW103",
        }
    }

    /// Tape width in millimeters
    pub fn width_mm(&self) -> u32 {
        match self {
            LabelSize::DieCutW17H54 | LabelSize::DieCutW17H87 => 17,
            LabelSize::DieCutW23H23 => 23,
            LabelSize::DieCutW29H42 | LabelSize::DieCutW29H90 | LabelSize::RollW29 => 29,
            LabelSize::DieCutW38H90 | LabelSize::RollW38 => 38,
            LabelSize::DieCutW39H48 => 39,
            LabelSize::DieCutW52H29 => 52,
            LabelSize::DieCutW62H29 | LabelSize::DieCutW62H100 => 62,
            LabelSize::RollW62 | LabelSize::RollW62RB => 62,
            LabelSize::DieCutW60H86 => 60,
            LabelSize::DieCutW54H29 | LabelSize::RollW54 => 54,
            LabelSize::DieCutW102H51 | LabelSize::DieCutW102H152 | LabelSize::RollW102 => 102,
            LabelSize::DieCutW103H164 | LabelSize::RollW103 => 103,
            LabelSize::RollW12 => 12,
            LabelSize::RollW50 => 50,
        }
    }

    /// Printable width in dots at the QL head resolution (300 dpi)
    pub fn width_dots(&self) -> u32 {
        match self.width_mm() {
            12 => 106,
            17 => 165,
            23 => 202,
            29 => 306,
            38 => 413,
            39 => 425,
            50 => 554,
            52 => 578,
            54 => 590,
            60 => 672,
            62 => 696,
            102 => 1164,
            103 => 1200,
            // unreachable for the enumerated media, but keep a sane floor
            _ => 306,
        }
    }
}

impl std::str::FromStr for LabelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DieCutW17H54" => Ok(LabelSize::DieCutW17H54),
            "DieCutW17H87" => Ok(LabelSize::DieCutW17H87),
            "DieCutW23H23" => Ok(LabelSize::DieCutW23H23),
            "DieCutW29H42" => Ok(LabelSize::DieCutW29H42),
            "DieCutW29H90" => Ok(LabelSize::DieCutW29H90),
            "DieCutW38H90" => Ok(LabelSize::DieCutW38H90),
            "DieCutW39H48" => Ok(LabelSize::DieCutW39H48),
            "DieCutW52H29" => Ok(LabelSize::DieCutW52H29),
            "DieCutW62H29" => Ok(LabelSize::DieCutW62H29),
            "DieCutW62H100" => Ok(LabelSize::DieCutW62H100),
            "DieCutW60H86" => Ok(LabelSize::DieCutW60H86),
            "DieCutW54H29" => Ok(LabelSize::DieCutW54H29),
            "DieCutW102H51" => Ok(LabelSize::DieCutW102H51),
            "DieCutW102H152" => Ok(LabelSize::DieCutW102H152),
            "DieCutW103H164" => Ok(LabelSize::DieCutW103H164),
            "RollW12" => Ok(LabelSize::RollW12),
            "RollW29" => Ok(LabelSize::RollW29),
            "RollW38" => Ok(LabelSize::RollW38),
            "RollW50" => Ok(LabelSize::RollW50),
            "RollW54" => Ok(LabelSize::RollW54),
            "RollW62" => Ok(LabelSize::RollW62),
            "RollW62RB" => Ok(LabelSize::RollW62RB),
            "RollW102" => Ok(LabelSize::RollW102),
            "RollW103" => Ok(LabelSize::RollW103),
            other => Err(format!("Unknown label size: {}", other)),
        }
    }
}

impl std::fmt::Display for LabelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Printer configuration read on every print
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterSettings {
    pub ip_address: String,
    pub model: PrinterModel,
    pub label_size: LabelSize,
}
