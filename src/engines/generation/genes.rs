//! Gene table shared between the engine and the signal consumer.
//!
//! A parameter vector is a fixed, ordered sequence of [`GENE_COUNT`] named
//! genes. Each gene has a legal `[min, max]` range and a mutation class that
//! decides how far a single mutation may move it. The order of [`Gene::ALL`]
//! is the wire order of the genome; consumers look genes up by name through
//! [`Gene::from_name`].

use crate::error::{EvobiasError, Result};
use std::collections::HashSet;

pub const GENE_COUNT: usize = 40;

/// Mutation step classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationClass {
    /// Core indicator periods
    Period,
    /// Risk multipliers and score thresholds
    Ratio,
    /// Logic mode, volume weight, legacy regime gate
    Mode,
    /// Exit-tactic toggles and their parameters
    ExitTactic,
    /// Secondary trend/oscillator periods (SSL, QQE, PSAR, Aroon)
    ExtendedTactic,
    /// Regime-gate flags and component weights
    GateWeight,
}

impl MutationClass {
    /// Maximum absolute perturbation for one mutation
    pub fn magnitude(&self) -> f64 {
        match self {
            MutationClass::Period => 2.0,
            MutationClass::Ratio => 0.2,
            MutationClass::Mode => 0.5,
            MutationClass::ExitTactic => 1.0,
            MutationClass::ExtendedTactic => 1.5,
            MutationClass::GateWeight => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GeneSpec {
    pub gene: Gene,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub class: MutationClass,
}

impl GeneSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gene {
    StFactor,
    StPeriod,
    RsiPeriod,
    RsiOverbought,
    RsiOversold,
    MacdFast,
    MacdSlow,
    MacdSignal,
    RiskTpAtr,
    RiskSlAtr,
    StackThreshold,
    BrainThreshold,
    LogicMode,
    VolumeWeight,
    RegimeGate,
    ExitRsiEnable,
    ExitRsiLevel,
    ExitMomoEnable,
    ExitMomoBars,
    ExitStallEnable,
    ExitStallBars,
    ExitMaEnable,
    ExitMaPeriod,
    SslPeriod1,
    SslPeriod2,
    QqeRsiPeriod,
    QqeSmooth,
    QqeFactor,
    PsarStart,
    PsarIncrement,
    PsarMax,
    AroonPeriod,
    RegimeGateTrendOnly,
    RegimeGateRangeOnly,
    RegimeGateChoppyOnly,
    WeightLead,
    WeightStack,
    WeightRegime,
    WeightVolume,
    WeightHybrid,
}

macro_rules! spec {
    ($gene:ident, $name:literal, $min:expr, $max:expr, $class:ident) => {
        GeneSpec {
            gene: Gene::$gene,
            name: $name,
            min: $min,
            max: $max,
            class: MutationClass::$class,
        }
    };
}

const GENE_SPECS: [GeneSpec; GENE_COUNT] = [
    spec!(StFactor, "ST_FACTOR", 1.0, 5.0, Period),
    spec!(StPeriod, "ST_PERIOD", 7.0, 21.0, Period),
    spec!(RsiPeriod, "RSI_PERIOD", 7.0, 21.0, Period),
    spec!(RsiOverbought, "RSI_OVERBOUGHT", 60.0, 80.0, Period),
    spec!(RsiOversold, "RSI_OVERSOLD", 20.0, 40.0, Period),
    spec!(MacdFast, "MACD_FAST", 8.0, 16.0, Period),
    spec!(MacdSlow, "MACD_SLOW", 20.0, 30.0, Period),
    spec!(MacdSignal, "MACD_SIGNAL", 7.0, 11.0, Period),
    spec!(RiskTpAtr, "RISK_TP_ATR", 1.0, 4.0, Ratio),
    spec!(RiskSlAtr, "RISK_SL_ATR", 0.5, 2.0, Ratio),
    spec!(StackThreshold, "STACK_THRESHOLD", 0.3, 0.8, Ratio),
    spec!(BrainThreshold, "BRAIN_THRESHOLD", 0.4, 0.9, Ratio),
    spec!(LogicMode, "LOGIC_MODE", 0.0, 2.0, Mode),
    spec!(VolumeWeight, "VOLUME_WEIGHT", 0.0, 2.0, Mode),
    spec!(RegimeGate, "REGIME_GATE", 0.0, 1.0, Mode),
    spec!(ExitRsiEnable, "EXIT_RSI_ENABLE", 0.0, 1.0, ExitTactic),
    spec!(ExitRsiLevel, "EXIT_RSI_LEVEL", 65.0, 85.0, ExitTactic),
    spec!(ExitMomoEnable, "EXIT_MOMO_ENABLE", 0.0, 1.0, ExitTactic),
    spec!(ExitMomoBars, "EXIT_MOMO_BARS", 3.0, 12.0, ExitTactic),
    spec!(ExitStallEnable, "EXIT_STALL_ENABLE", 0.0, 1.0, ExitTactic),
    spec!(ExitStallBars, "EXIT_STALL_BARS", 5.0, 15.0, ExitTactic),
    spec!(ExitMaEnable, "EXIT_MA_ENABLE", 0.0, 1.0, ExitTactic),
    spec!(ExitMaPeriod, "EXIT_MA_PERIOD", 15.0, 30.0, ExitTactic),
    spec!(SslPeriod1, "SSL_PERIOD_1", 8.0, 16.0, ExtendedTactic),
    spec!(SslPeriod2, "SSL_PERIOD_2", 16.0, 24.0, ExtendedTactic),
    spec!(QqeRsiPeriod, "QQE_RSI_PERIOD", 10.0, 18.0, ExtendedTactic),
    spec!(QqeSmooth, "QQE_SMOOTH", 3.0, 7.0, ExtendedTactic),
    spec!(QqeFactor, "QQE_FACTOR", 3.0, 5.0, ExtendedTactic),
    spec!(PsarStart, "PSAR_START", 0.01, 0.03, ExtendedTactic),
    spec!(PsarIncrement, "PSAR_INCREMENT", 0.01, 0.03, ExtendedTactic),
    spec!(PsarMax, "PSAR_MAX", 0.15, 0.25, ExtendedTactic),
    spec!(AroonPeriod, "AROON_PERIOD", 10.0, 20.0, ExtendedTactic),
    spec!(RegimeGateTrendOnly, "REGIME_GATE_TREND_ONLY", 0.0, 1.0, GateWeight),
    spec!(RegimeGateRangeOnly, "REGIME_GATE_RANGE_ONLY", 0.0, 1.0, GateWeight),
    spec!(RegimeGateChoppyOnly, "REGIME_GATE_CHOPPY_ONLY", 0.0, 1.0, GateWeight),
    spec!(WeightLead, "WEIGHT_LEAD", 0.0, 1.0, GateWeight),
    spec!(WeightStack, "WEIGHT_STACK", 0.0, 1.0, GateWeight),
    spec!(WeightRegime, "WEIGHT_REGIME", 0.0, 1.0, GateWeight),
    spec!(WeightVolume, "WEIGHT_VOLUME", 0.0, 1.0, GateWeight),
    spec!(WeightHybrid, "WEIGHT_HYBRID", 0.0, 1.0, GateWeight),
];

pub static GENE_TABLE: [GeneSpec; GENE_COUNT] = GENE_SPECS;

impl Gene {
    pub const ALL: [Gene; GENE_COUNT] = {
        let mut all = [Gene::StFactor; GENE_COUNT];
        let mut i = 0;
        while i < GENE_COUNT {
            all[i] = GENE_SPECS[i].gene;
            i += 1;
        }
        all
    };

    /// Position of this gene in the genome
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static GeneSpec {
        &GENE_TABLE[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Result<Gene> {
        Gene::ALL
            .into_iter()
            .find(|gene| gene.name() == name)
            .ok_or_else(|| EvobiasError::UnknownParameter(name.to_string()))
    }
}

/// Check the gene table for completeness and consistency.
///
/// Every slot must hold the gene whose discriminant matches its position,
/// names must be unique and every range must be non-empty.
pub fn validate_gene_table(table: &[GeneSpec]) -> Result<()> {
    if table.len() != GENE_COUNT {
        return Err(EvobiasError::GeneCount {
            expected: GENE_COUNT,
            actual: table.len(),
        });
    }

    let mut names = HashSet::with_capacity(table.len());
    for (i, spec) in table.iter().enumerate() {
        if spec.gene.index() != i {
            return Err(EvobiasError::Configuration(format!(
                "Gene {} is declared at slot {} but indexes slot {}",
                spec.name,
                i,
                spec.gene.index()
            )));
        }
        if !names.insert(spec.name) {
            return Err(EvobiasError::Configuration(format!(
                "Duplicate gene name: {}",
                spec.name
            )));
        }
        if !(spec.min <= spec.max) {
            return Err(EvobiasError::Configuration(format!(
                "Gene {} has an empty range [{}, {}]",
                spec.name, spec.min, spec.max
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete() {
        validate_gene_table(&GENE_TABLE).unwrap();
    }

    #[test]
    fn test_truncated_table_rejected() {
        let result = validate_gene_table(&GENE_TABLE[..32]);
        assert!(matches!(
            result,
            Err(EvobiasError::GeneCount { expected: 40, actual: 32 })
        ));
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(Gene::from_name("RSI_PERIOD").unwrap(), Gene::RsiPeriod);
        assert_eq!(Gene::RsiPeriod.index(), 2);
        assert_eq!(Gene::WeightHybrid.index(), 39);
        assert!(matches!(
            Gene::from_name("NOT_A_GENE"),
            Err(EvobiasError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_all_follows_genome_order() {
        for (i, gene) in Gene::ALL.iter().enumerate() {
            assert_eq!(gene.index(), i);
            assert_eq!(Gene::from_name(gene.name()).unwrap(), *gene);
        }
    }

    #[test]
    fn test_mutation_classes() {
        assert_eq!(Gene::MacdSignal.spec().class.magnitude(), 2.0);
        assert_eq!(Gene::BrainThreshold.spec().class.magnitude(), 0.2);
        assert_eq!(Gene::RegimeGate.spec().class.magnitude(), 0.5);
        assert_eq!(Gene::ExitMaPeriod.spec().class.magnitude(), 1.0);
        assert_eq!(Gene::AroonPeriod.spec().class.magnitude(), 1.5);
        assert_eq!(Gene::WeightLead.spec().class.magnitude(), 0.3);
    }

    #[test]
    fn test_clamp() {
        let spec = Gene::RsiPeriod.spec();
        assert_eq!(spec.clamp(3.0), 7.0);
        assert_eq!(spec.clamp(30.0), 21.0);
        assert_eq!(spec.clamp(14.0), 14.0);
        assert_eq!(spec.clamp(f64::NAN), 7.0);
    }
}
