use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::AppError;
use crate::models::news::Country;

/// A ticker followed by the daily indicator report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedStock {
    pub name: String,
    pub ticker: String,
    pub sector: String,
}

/// A company watched by the news monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedCompany {
    pub name: String,
    pub ticker: String,
    pub priority: u8,
    pub country: Country,
    pub search_terms: Vec<String>,
}

/// A stock competing for the selected slot of a sub-sector. Identity is the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub ticker: String,
    pub exchange: String,
}

/// Named group of candidates; exactly one of them is selected per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub sub_sector: String,
    pub category: String,
    pub sector: String,
    pub candidates: Vec<Candidate>,
}

/// Two-tier keyword list used for title relevance scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTaxonomy {
    pub high: Vec<String>,
    pub medium: Vec<String>,
}

impl KeywordTaxonomy {
    pub fn new(high: &[&str], medium: &[&str]) -> Self {
        Self {
            high: high.iter().map(|s| s.to_string()).collect(),
            medium: medium.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn english() -> Self {
        Self::new(
            &["AI", "GPU", "HBM", "datacenter", "data center", "earnings", "chip"],
            &["partnership", "contract", "launch", "investment"],
        )
    }

    pub fn korean() -> Self {
        Self::new(
            &["AI", "HBM", "GPU", "데이터센터", "반도체", "실적", "수주"],
            &["파트너십", "계약", "투자", "출시"],
        )
    }
}

/// Immutable configuration tables shared by all jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub daily_stocks: Vec<TrackedStock>,
    pub watch_list: Vec<WatchedCompany>,
    pub candidate_pools: Vec<CandidatePool>,
    pub english_keywords: KeywordTaxonomy,
    pub korean_keywords: KeywordTaxonomy,
}

impl Universe {
    /// Reads a universe from a JSON file with the same shape as this struct.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let universe: Universe = serde_json::from_str(&raw)?;
        Ok(universe)
    }

    pub fn keywords_for(&self, country: Country) -> &KeywordTaxonomy {
        match country {
            Country::KR => &self.korean_keywords,
            Country::US => &self.english_keywords,
        }
    }

    pub fn builtin() -> Self {
        Self {
            daily_stocks: builtin_daily_stocks(),
            watch_list: builtin_watch_list(),
            candidate_pools: builtin_candidate_pools(),
            english_keywords: KeywordTaxonomy::english(),
            korean_keywords: KeywordTaxonomy::korean(),
        }
    }
}

fn tracked(name: &str, ticker: &str, sector: &str) -> TrackedStock {
    TrackedStock {
        name: name.to_string(),
        ticker: ticker.to_string(),
        sector: sector.to_string(),
    }
}

fn builtin_daily_stocks() -> Vec<TrackedStock> {
    vec![
        tracked("NVIDIA", "NVDA", "AI Chip"),
        tracked("AMD", "AMD", "AI Chip"),
        tracked("Intel", "INTC", "AI Chip"),
        tracked("Super Micro", "SMCI", "AI Server"),
        tracked("Dell", "DELL", "AI Server"),
        tracked("Vertiv", "VRT", "Power"),
        tracked("Eaton", "ETN", "Power"),
        tracked("LS ELECTRIC", "010120.KS", "Power"),
        tracked("Cummins", "CMI", "Generation"),
        tracked("Generac", "GNRC", "Generation"),
        tracked("Johnson Controls", "JCI", "Cooling"),
        tracked("Trane Tech", "TT", "Cooling"),
        tracked("Arista Networks", "ANET", "Network"),
        tracked("Broadcom", "AVGO", "Network"),
        tracked("Marvell", "MRVL", "Network"),
        tracked("HFR", "230240.KQ", "Optical"),
        tracked("Corning", "GLW", "Fiber"),
        tracked("Lumentum", "LITE", "Optical"),
        tracked("SK hynix", "000660.KS", "HBM"),
        tracked("Samsung", "005930.KS", "HBM"),
        tracked("Micron", "MU", "HBM"),
        tracked("Hanmi Semiconductor", "042700.KQ", "Packaging"),
        tracked("Amkor", "AMKR", "Packaging"),
        tracked("Western Digital", "WDC", "SSD"),
        tracked("Digital Realty", "DLR", "DC REIT"),
        tracked("Equinix", "EQIX", "DC REIT"),
    ]
}

fn watched(name: &str, ticker: &str, priority: u8, country: Country, terms: &[&str]) -> WatchedCompany {
    WatchedCompany {
        name: name.to_string(),
        ticker: ticker.to_string(),
        priority,
        country,
        search_terms: terms.iter().map(|s| s.to_string()).collect(),
    }
}

fn builtin_watch_list() -> Vec<WatchedCompany> {
    use Country::{KR, US};
    vec![
        watched("NVIDIA", "NVDA", 1, US, &["NVIDIA AI", "NVIDIA datacenter"]),
        watched("AMD", "AMD", 1, US, &["AMD AI chip", "AMD datacenter"]),
        watched("Intel", "INTC", 2, US, &["Intel datacenter", "Intel AI"]),
        watched("Super Micro", "SMCI", 1, US, &["Super Micro AI server"]),
        watched("Broadcom", "AVGO", 1, US, &["Broadcom AI chip"]),
        watched("Micron", "MU", 1, US, &["Micron HBM", "Micron memory"]),
        watched("SK Hynix", "000660.KS", 1, KR, &["SK하이닉스 HBM", "SK하이닉스 AI"]),
        watched("Samsung", "005930.KS", 1, KR, &["삼성전자 반도체", "삼성전자 HBM"]),
        watched("LS ELECTRIC", "010120.KS", 1, KR, &["LS ELECTRIC 데이터센터"]),
        watched("Hanmi", "042700.KQ", 2, KR, &["한미반도체 AI"]),
    ]
}

fn pool(sub_sector: &str, category: &str, sector: &str, candidates: &[(&str, &str, &str)]) -> CandidatePool {
    CandidatePool {
        sub_sector: sub_sector.to_string(),
        category: category.to_string(),
        sector: sector.to_string(),
        candidates: candidates
            .iter()
            .map(|(name, ticker, exchange)| Candidate {
                name: name.to_string(),
                ticker: ticker.to_string(),
                exchange: exchange.to_string(),
            })
            .collect(),
    }
}

fn builtin_candidate_pools() -> Vec<CandidatePool> {
    const AI: &str = "AI Infrastructure";
    const POWER: &str = "Power/Cooling";
    const NET: &str = "Network";
    const MEM: &str = "Memory/Storage";
    const REIT: &str = "DC Real Estate";

    vec![
        pool("GPU", AI, "AI Chip", &[("NVIDIA", "NVDA", "US"), ("AMD", "AMD", "US")]),
        pool("CPU", AI, "AI Chip", &[("Intel", "INTC", "US"), ("AMD", "AMD", "US")]),
        pool("Server OEM", AI, "AI Server", &[
            ("Super Micro", "SMCI", "US"),
            ("Dell", "DELL", "US"),
            ("HPE", "HPE", "US"),
            ("Lenovo", "0992.HK", "HK"),
        ]),
        pool("Power Management", POWER, "Power", &[
            ("Vertiv", "VRT", "US"),
            ("Eaton", "ETN", "US"),
            ("Schneider Electric", "SU.PA", "EU"),
        ]),
        pool("Power Equipment", POWER, "Power", &[
            ("LS ELECTRIC", "010120.KS", "KR"),
            ("LS", "006260.KS", "KR"),
        ]),
        pool("Generators", POWER, "Generation", &[
            ("Cummins", "CMI", "US"),
            ("Generac", "GNRC", "US"),
            ("Caterpillar", "CAT", "US"),
        ]),
        pool("HVAC", POWER, "Cooling", &[
            ("Johnson Controls", "JCI", "US"),
            ("Trane Tech", "TT", "US"),
            ("Carrier Global", "CARR", "US"),
        ]),
        pool("Switches", NET, "Network", &[
            ("Arista Networks", "ANET", "US"),
            ("Cisco", "CSCO", "US"),
            ("Juniper", "JNPR", "US"),
        ]),
        pool("Network Chips", NET, "Network", &[
            ("Broadcom", "AVGO", "US"),
            ("Marvell", "MRVL", "US"),
            ("Microchip", "MCHP", "US"),
        ]),
        pool("Optical Transceivers", NET, "Optical", &[
            ("HFR", "230240.KQ", "KR"),
            ("Optrontec", "082210.KQ", "KR"),
        ]),
        pool("Fiber Cable", NET, "Fiber", &[
            ("Corning", "GLW", "US"),
            ("Prysmian", "PRY.MI", "EU"),
        ]),
        pool("Optical Components", NET, "Optical", &[
            ("Lumentum", "LITE", "US"),
            ("Coherent", "COHR", "US"),
        ]),
        pool("HBM Memory", MEM, "HBM", &[
            ("SK hynix", "000660.KS", "KR"),
            ("Samsung", "005930.KS", "KR"),
            ("Micron", "MU", "US"),
        ]),
        pool("Semiconductor Packaging", MEM, "Packaging", &[
            ("Hanmi Semiconductor", "042700.KQ", "KR"),
            ("Amkor", "AMKR", "US"),
            ("ASE Technology", "3711.TW", "TW"),
        ]),
        pool("Storage", MEM, "SSD", &[
            ("Western Digital", "WDC", "US"),
            ("Seagate", "STX", "US"),
            ("NetApp", "NTAP", "US"),
        ]),
        pool("Data Center REIT", REIT, "DC REIT", &[
            ("Digital Realty", "DLR", "US"),
            ("Equinix", "EQIX", "US"),
            ("CyrusOne", "CONE", "US"),
        ]),
    ]
}
