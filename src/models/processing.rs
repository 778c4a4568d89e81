//! # 处理结果数据模型
//!
//! 存储 autoPROC 自动处理、缩放统计与筛选 (screening) 结果的提取信息。
//! 所有数值字段均为 `Option<f64>`：源文本无法解析为数值时为 `None`，
//! 序列化为 JSON `null`。
//!
//! ## 依赖关系
//! - 被 `parsers/` 填充
//! - 被 `models/collection.rs`, `report/html.rs` 使用

use serde::{Deserialize, Serialize};

/// 晶胞参数 (A, B, C, ALPHA, BETA, GAMMA)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    #[serde(rename = "A")]
    pub a: Option<f64>,
    #[serde(rename = "B")]
    pub b: Option<f64>,
    #[serde(rename = "C")]
    pub c: Option<f64>,
    #[serde(rename = "ALPHA")]
    pub alpha: Option<f64>,
    #[serde(rename = "BETA")]
    pub beta: Option<f64>,
    #[serde(rename = "GAMMA")]
    pub gamma: Option<f64>,
}

impl CellData {
    /// 六个晶胞参数的键名，按显示顺序
    pub const KEYS: [&'static str; 6] = ["A", "B", "C", "ALPHA", "BETA", "GAMMA"];

    /// 按键名（不区分大小写）写入参数，未知键返回 false
    pub fn set(&mut self, key: &str, value: Option<f64>) -> bool {
        let slot = match key.to_ascii_uppercase().as_str() {
            "A" => &mut self.a,
            "B" => &mut self.b,
            "C" => &mut self.c,
            "ALPHA" => &mut self.alpha,
            "BETA" => &mut self.beta,
            "GAMMA" => &mut self.gamma,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// 按键名读取参数
    pub fn get(&self, key: &str) -> Option<f64> {
        match key.to_ascii_uppercase().as_str() {
            "A" => self.a,
            "B" => self.b,
            "C" => self.c,
            "ALPHA" => self.alpha,
            "BETA" => self.beta,
            "GAMMA" => self.gamma,
            _ => None,
        }
    }

    /// 所有参数均缺失
    pub fn is_empty(&self) -> bool {
        Self::KEYS.iter().all(|k| self.get(k).is_none())
    }
}

/// 缩放统计的分辨率壳层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Overall,
    Inner,
    Outer,
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Overall, Shell::Inner, Shell::Outer];

    /// 从 `scalingStatisticsType` 文本识别壳层
    pub fn from_type(text: &str) -> Option<Shell> {
        match text.trim().to_ascii_lowercase().as_str() {
            "overall" => Some(Shell::Overall),
            "innershell" => Some(Shell::Inner),
            "outershell" => Some(Shell::Outer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shell::Overall => "Overall",
            Shell::Inner => "Inner Shell",
            Shell::Outer => "Outer Shell",
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 单个壳层的缩放统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellStatistics {
    #[serde(rename = "Resolution Limit Low")]
    pub resolution_limit_low: Option<f64>,
    #[serde(rename = "Resolution Limit High")]
    pub resolution_limit_high: Option<f64>,
    #[serde(rename = "RMerge")]
    pub r_merge: Option<f64>,
    #[serde(rename = "RMeas Within IPlus IMinus")]
    pub r_meas_within_i_plus_i_minus: Option<f64>,
    #[serde(rename = "RMeas All IPlus IMinus")]
    pub r_meas_all_i_plus_i_minus: Option<f64>,
    #[serde(rename = "RPim Within IPlus IMinus")]
    pub r_pim_within_i_plus_i_minus: Option<f64>,
    #[serde(rename = "RPim All IPlus IMinus")]
    pub r_pim_all_i_plus_i_minus: Option<f64>,
    #[serde(rename = "N Total Observations")]
    pub n_total_observations: Option<f64>,
    #[serde(rename = "N Total Unique Observations")]
    pub n_total_unique_observations: Option<f64>,
    #[serde(rename = "Mean I Over SigI")]
    pub mean_i_over_sig_i: Option<f64>,
    #[serde(rename = "Completeness")]
    pub completeness: Option<f64>,
    #[serde(rename = "Multiplicity")]
    pub multiplicity: Option<f64>,
    #[serde(rename = "CC Half")]
    pub cc_half: Option<f64>,
    #[serde(rename = "Anomalous Completeness")]
    pub anomalous_completeness: Option<f64>,
    #[serde(rename = "Anomalous Multiplicity")]
    pub anomalous_multiplicity: Option<f64>,
    #[serde(rename = "CC Anomalous")]
    pub cc_anomalous: Option<f64>,
    #[serde(rename = "DAno Over SigDAno Tool", alias = "DAno Over SigDAno")]
    pub d_ano_over_sig_d_ano: Option<f64>,
}

impl ShellStatistics {
    /// 按 autoPROC 元素名（不区分大小写）写入统计量，未知元素返回 false
    pub fn set(&mut self, element: &str, value: Option<f64>) -> bool {
        let slot = match element.to_ascii_lowercase().as_str() {
            "resolutionlimitlow" => &mut self.resolution_limit_low,
            "resolutionlimithigh" => &mut self.resolution_limit_high,
            "rmerge" => &mut self.r_merge,
            "rmeaswithiniplusiminus" => &mut self.r_meas_within_i_plus_i_minus,
            "rmeasalliplusiminus" => &mut self.r_meas_all_i_plus_i_minus,
            "rpimwithiniplusiminus" => &mut self.r_pim_within_i_plus_i_minus,
            "rpimalliplusiminus" => &mut self.r_pim_all_i_plus_i_minus,
            "ntotalobservations" => &mut self.n_total_observations,
            "ntotaluniqueobservations" => &mut self.n_total_unique_observations,
            "meanioversigi" => &mut self.mean_i_over_sig_i,
            "completeness" => &mut self.completeness,
            "multiplicity" => &mut self.multiplicity,
            "cchalf" => &mut self.cc_half,
            "anomalouscompleteness" => &mut self.anomalous_completeness,
            "anomalousmultiplicity" => &mut self.anomalous_multiplicity,
            "ccanomalous" => &mut self.cc_anomalous,
            "danooversigdano" | "danooversigdanotool" => &mut self.d_ano_over_sig_d_ano,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// 报告中显示的统计量（标签, 数值）
    pub fn rows(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("Resolution Low (Å)", self.resolution_limit_low),
            ("Resolution High (Å)", self.resolution_limit_high),
            ("Rmerge", self.r_merge),
            ("Rpim (all I+/I-)", self.r_pim_all_i_plus_i_minus),
            ("Total Observations", self.n_total_observations),
            ("Unique Observations", self.n_total_unique_observations),
            ("Mean I/σ(I)", self.mean_i_over_sig_i),
            ("Completeness (%)", self.completeness),
            ("Multiplicity", self.multiplicity),
            ("CC½", self.cc_half),
        ]
    }
}

/// 三个壳层的缩放统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleData {
    pub overall: Option<ShellStatistics>,
    #[serde(rename = "innerShell")]
    pub inner_shell: Option<ShellStatistics>,
    #[serde(rename = "outerShell")]
    pub outer_shell: Option<ShellStatistics>,
}

impl ScaleData {
    pub fn shell(&self, shell: Shell) -> Option<&ShellStatistics> {
        match shell {
            Shell::Overall => self.overall.as_ref(),
            Shell::Inner => self.inner_shell.as_ref(),
            Shell::Outer => self.outer_shell.as_ref(),
        }
    }

    pub fn shell_mut(&mut self, shell: Shell) -> &mut Option<ShellStatistics> {
        match shell {
            Shell::Overall => &mut self.overall,
            Shell::Inner => &mut self.inner_shell,
            Shell::Outer => &mut self.outer_shell,
        }
    }

    pub fn is_empty(&self) -> bool {
        Shell::ALL.iter().all(|s| self.shell(*s).is_none())
    }
}

/// autoPROC.xml 中的 AutoProc 段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoProcSummary {
    #[serde(rename = "spaceGroup")]
    pub space_group: Option<String>,
    pub wavelength: Option<f64>,
    pub cell_data: CellData,
}

/// 合并后的自动处理结果（`processing.autoproc_xml`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoProcXml {
    #[serde(rename = "spaceGroup")]
    pub space_group: Option<String>,
    pub wavelength: Option<f64>,
    pub cell_data: CellData,
    pub scale_data: ScaleData,
}

/// 处理结果，仅在至少一个读取器返回数据时存在
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub autoproc_xml: AutoProcXml,
}

impl ProcessingResult {
    /// 由 AutoProc 段与缩放统计组装；两者都缺失时返回 `None`
    pub fn assemble(summary: Option<AutoProcSummary>, scaling: Option<ScaleData>) -> Option<Self> {
        if summary.is_none() && scaling.is_none() {
            return None;
        }
        let summary = summary.unwrap_or_default();
        Some(ProcessingResult {
            autoproc_xml: AutoProcXml {
                space_group: summary.space_group,
                wavelength: summary.wavelength,
                cell_data: summary.cell_data,
                scale_data: scaling.unwrap_or_default(),
            },
        })
    }
}

/// 筛选 (screening) 结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub program: Option<String>,
    pub comments: Option<String>,
    #[serde(rename = "indexingSuccess")]
    pub indexing_success: Option<bool>,
    pub mosaicity: Option<f64>,
    #[serde(rename = "rankingResolution")]
    pub ranking_resolution: Option<f64>,
    #[serde(rename = "numSpotsFound")]
    pub num_spots_found: Option<f64>,
    #[serde(rename = "spaceGroup")]
    pub space_group: Option<String>,
    pub cell_data: CellData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_data_set_and_get() {
        let mut cell = CellData::default();
        assert!(cell.is_empty());
        assert!(cell.set("alpha", Some(90.0)));
        assert!(cell.set("A", Some(78.12)));
        assert!(!cell.set("delta", Some(1.0)));

        assert_eq!(cell.get("ALPHA"), Some(90.0));
        assert_eq!(cell.a, Some(78.12));
        assert_eq!(cell.get("B"), None);
        assert!(!cell.is_empty());
    }

    #[test]
    fn test_shell_from_type() {
        assert_eq!(Shell::from_type("overall"), Some(Shell::Overall));
        assert_eq!(Shell::from_type(" innerShell "), Some(Shell::Inner));
        assert_eq!(Shell::from_type("OUTERSHELL"), Some(Shell::Outer));
        assert_eq!(Shell::from_type("middle"), None);
    }

    #[test]
    fn test_shell_statistics_case_insensitive_keys() {
        let mut stats = ShellStatistics::default();
        assert!(stats.set("ccHalf", Some(0.998)));
        assert!(stats.set("meanIOverSigI", Some(14.2)));
        assert!(!stats.set("scalingStatisticsType", None));

        assert_eq!(stats.cc_half, Some(0.998));
        assert_eq!(stats.mean_i_over_sig_i, Some(14.2));
    }

    #[test]
    fn test_anomalous_signal_key() {
        let mut stats = ShellStatistics::default();
        assert!(stats.set("DAnoOverSigDAnoTool", Some(1.4)));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["DAno Over SigDAno Tool"], 1.4);

        let old: ShellStatistics =
            serde_json::from_str(r#"{"DAno Over SigDAno": 0.9}"#).unwrap();
        assert_eq!(old.d_ano_over_sig_d_ano, Some(0.9));
    }

    #[test]
    fn test_processing_assemble_requires_some_data() {
        assert!(ProcessingResult::assemble(None, None).is_none());

        let mut scale = ScaleData::default();
        *scale.shell_mut(Shell::Overall) = Some(ShellStatistics::default());
        let processing = ProcessingResult::assemble(None, Some(scale)).unwrap();

        assert!(processing.autoproc_xml.space_group.is_none());
        assert!(processing.autoproc_xml.cell_data.is_empty());
        assert!(processing.autoproc_xml.scale_data.overall.is_some());
    }

    #[test]
    fn test_absent_values_serialize_as_null() {
        let mut cell = CellData::default();
        cell.set("B", Some(45.5));
        let json = serde_json::to_value(&cell).unwrap();

        assert!(json["A"].is_null());
        assert_eq!(json["B"], 45.5);
    }
}
