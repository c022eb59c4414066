use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{Days, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Broad activity family. Drives the gross-margin and prazo targets used by
/// gap analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorFamily {
    Commerce,
    Industry,
    Services,
    General,
}

impl SectorFamily {
    /// Classify a sector code by substring: "comercio"/"varejo" is commerce,
    /// "transformacao"/"industria" is industry, "servicos" is services.
    pub fn from_code(code: &str) -> Self {
        let code = code.to_lowercase();
        if code.contains("comercio") || code.contains("varejo") {
            SectorFamily::Commerce
        } else if code.contains("transformacao") || code.contains("industria") {
            SectorFamily::Industry
        } else if code.contains("servicos") {
            SectorFamily::Services
        } else {
            SectorFamily::General
        }
    }

    /// Whether the business mainly sells goods (as opposed to services).
    pub fn sells_goods(&self) -> bool {
        matches!(self, SectorFamily::Commerce | SectorFamily::Industry)
    }
}

/// Operating targets shared by every sector of a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyTargets {
    /// Gross margin the sector typically achieves (%)
    pub gross_margin: Percent,
    /// Collection period target (days)
    pub collection_days: Days,
    /// Payment period target (days)
    pub payment_days: Days,
    /// Cash conversion cycle target (days)
    pub cash_cycle: Days,
    /// Immediate liquidity considered comfortable
    pub liquidity: Decimal,
}

impl FamilyTargets {
    pub fn for_family(family: SectorFamily) -> Self {
        let (gross_margin, collection_days, payment_days, cash_cycle) = match family {
            SectorFamily::Commerce => (dec!(30), dec!(30), dec!(45), dec!(15)),
            SectorFamily::Industry => (dec!(40), dec!(45), dec!(60), dec!(30)),
            SectorFamily::Services => (dec!(50), dec!(30), dec!(30), dec!(10)),
            SectorFamily::General => (dec!(35), dec!(35), dec!(45), dec!(25)),
        };
        FamilyTargets {
            gross_margin,
            collection_days,
            payment_days,
            cash_cycle,
            liquidity: dec!(1.5),
        }
    }
}

/// Everything the engine knows about one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorProfile {
    pub code: String,
    pub name: String,
    pub family: SectorFamily,
    /// DSO assumed when the business does not disclose it
    pub dso_default: Days,
    /// DPO assumed when the business does not disclose it
    pub dpo_default: Days,
    /// Immediate liquidity the sector's peers sustain
    pub liquidity_target: Decimal,
    /// Net margin the sector's peers sustain (%)
    pub net_margin_target: Percent,
    /// Debt-to-assets ceiling (%)
    pub debt_ratio_ceiling: Percent,
    /// Annual inventory turns considered healthy
    pub inventory_turn_target: Decimal,
    pub targets: FamilyTargets,
    pub strategies: Vec<String>,
}

/// Read-only sector lookup. Built once (usually via [`BenchmarkTable::standard`])
/// and passed by reference into every stage that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTable {
    profiles: BTreeMap<String, SectorProfile>,
    fallback: SectorProfile,
}

// ---------------------------------------------------------------------------
// Peer groups
// ---------------------------------------------------------------------------

/// Published peer statistics that several sector codes share.
#[derive(Debug, Clone, Copy)]
enum PeerGroup {
    Retail,
    Services,
    Industry,
    Technology,
    Food,
    Health,
    Education,
    Construction,
    General,
}

impl PeerGroup {
    /// (liquidity target, net margin %, debt ratio ceiling %)
    fn ratios(self) -> (Decimal, Percent, Percent) {
        match self {
            PeerGroup::Retail => (dec!(1.3), dec!(4.0), dec!(55.0)),
            PeerGroup::Services => (dec!(1.5), dec!(8.0), dec!(45.0)),
            PeerGroup::Industry => (dec!(1.6), dec!(6.0), dec!(50.0)),
            PeerGroup::Technology => (dec!(2.0), dec!(15.0), dec!(35.0)),
            PeerGroup::Food => (dec!(1.2), dec!(5.0), dec!(50.0)),
            PeerGroup::Health => (dec!(1.7), dec!(10.0), dec!(40.0)),
            PeerGroup::Education => (dec!(1.8), dec!(12.0), dec!(40.0)),
            PeerGroup::Construction => (dec!(1.4), dec!(5.0), dec!(60.0)),
            PeerGroup::General => (dec!(1.5), dec!(5.0), dec!(50.0)),
        }
    }

    fn strategies(self) -> Vec<String> {
        let list: &[&str] = match self {
            PeerGroup::Retail => &[
                "Focus on high inventory turnover",
                "Negotiate payment terms with suppliers",
                "Optimize the product mix",
            ],
            PeerGroup::Services => &[
                "Price services adequately",
                "Invest in staff training",
                "Pursue recurring contracts",
            ],
            PeerGroup::Industry => &[
                "Optimize the production process",
                "Negotiate volume discounts with suppliers",
                "Invest in technology",
            ],
            PeerGroup::Technology => &[
                "Invest in innovation",
                "Pursue a recurring revenue model",
                "Control burn rate",
            ],
            PeerGroup::Food => &[
                "Control expiry dates and waste",
                "Negotiate cash purchase discounts",
                "Optimize the menu",
            ],
            PeerGroup::Health => &[
                "Invest in quality of care",
                "Negotiate with health plan operators",
                "Optimize the appointment schedule",
            ],
            PeerGroup::Education => &[
                "Reduce tuition delinquency",
                "Invest in teaching quality",
                "Diversify revenue sources",
            ],
            PeerGroup::Construction => &[
                "Control site costs",
                "Negotiate payment terms",
                "Keep working capital available",
            ],
            PeerGroup::General => FALLBACK_STRATEGIES,
        };
        list.iter().map(|s| s.to_string()).collect()
    }
}

const FALLBACK_STRATEGIES: &[&str] = &[
    "Keep tight control of cash flow",
    "Invest in differentiation",
];

/// (code, display name, DSO default, DPO default, peer group)
const SECTORS: &[(&str, &str, u32, u32, PeerGroup)] = &[
    ("agricultura", "Agriculture", 45, 30, PeerGroup::General),
    ("pecuaria", "Livestock", 45, 30, PeerGroup::General),
    ("extrativas", "Extractive industries", 60, 45, PeerGroup::Industry),
    ("transformacao", "Manufacturing", 45, 35, PeerGroup::Industry),
    ("eletricidade_gas", "Electricity and gas", 30, 30, PeerGroup::General),
    ("agua_residuos", "Water and waste management", 30, 30, PeerGroup::General),
    ("construcao", "Construction", 60, 45, PeerGroup::Construction),
    ("comercio_veiculos", "Trade and vehicle repair", 30, 30, PeerGroup::Retail),
    ("transporte", "Transport and storage", 30, 20, PeerGroup::Services),
    ("alojamento_alimentacao", "Accommodation and food", 15, 20, PeerGroup::Food),
    ("informacao_comunicacao", "Information and communication", 20, 15, PeerGroup::Technology),
    ("financeiras", "Financial activities", 30, 15, PeerGroup::Services),
    ("imobiliarias", "Real estate", 45, 30, PeerGroup::General),
    ("profissionais", "Professional and technical services", 20, 15, PeerGroup::Services),
    ("administrativas", "Administrative services", 30, 20, PeerGroup::Services),
    ("administracao_publica", "Public administration", 60, 30, PeerGroup::General),
    ("educacao", "Education", 30, 20, PeerGroup::Education),
    ("saude", "Health", 30, 20, PeerGroup::Health),
    ("artes_cultura", "Arts and culture", 30, 20, PeerGroup::Services),
    ("outras_atividades", "Other activities", 30, 20, PeerGroup::General),
    ("servicos_domesticos", "Domestic services", 15, 10, PeerGroup::Services),
];

const FALLBACK_CODE: &str = "nao_classificado";

fn build_profile(code: &str, name: &str, dso: u32, dpo: u32, group: PeerGroup) -> SectorProfile {
    let family = SectorFamily::from_code(code);
    let (liquidity_target, net_margin_target, debt_ratio_ceiling) = group.ratios();
    SectorProfile {
        code: code.to_string(),
        name: name.to_string(),
        family,
        dso_default: Decimal::from(dso),
        dpo_default: Decimal::from(dpo),
        liquidity_target,
        net_margin_target,
        debt_ratio_ceiling,
        inventory_turn_target: dec!(6),
        targets: FamilyTargets::for_family(family),
        strategies: group.strategies(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl BenchmarkTable {
    /// The built-in table covering the 21 sector codes the front-end offers.
    pub fn standard() -> Self {
        let profiles = SECTORS
            .iter()
            .map(|&(code, name, dso, dpo, group)| {
                (code.to_string(), build_profile(code, name, dso, dpo, group))
            })
            .collect();
        BenchmarkTable {
            profiles,
            fallback: build_profile(FALLBACK_CODE, "Unclassified", 30, 30, PeerGroup::General),
        }
    }

    /// Add or replace a sector profile, keyed by its (lower-cased) code.
    pub fn with_profile(mut self, mut profile: SectorProfile) -> Self {
        profile.code = profile.code.to_lowercase();
        self.profiles.insert(profile.code.clone(), profile);
        self
    }

    /// Benchmarks for a sector. Unknown codes yield the fallback profile.
    pub fn benchmarks(&self, sector: &str) -> &SectorProfile {
        match self.profiles.get(&sector.to_lowercase()) {
            Some(profile) => profile,
            None => {
                debug!(sector, "unknown sector code, using fallback benchmarks");
                &self.fallback
            }
        }
    }

    /// Sector-specific recommendation strings.
    pub fn strategies(&self, sector: &str) -> &[String] {
        &self.benchmarks(sector).strategies
    }

    /// (DSO, DPO) defaults used when tier-2 prazos are not disclosed.
    pub fn prazo_defaults(&self, sector: &str) -> (Days, Days) {
        let profile = self.benchmarks(sector);
        (profile.dso_default, profile.dpo_default)
    }

    pub fn is_known(&self, sector: &str) -> bool {
        self.profiles.contains_key(&sector.to_lowercase())
    }

    pub fn fallback(&self) -> &SectorProfile {
        &self.fallback
    }

    pub fn sectors(&self) -> impl Iterator<Item = &SectorProfile> {
        self.profiles.values()
    }
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
