use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::errors::{PncpError, PncpResult};

pub const SEQUENCIAL_MIN: i64 = 1;
pub const SEQUENCIAL_MAX: i64 = 9_999_999_999;
pub const ANO_MIN: i32 = 1900;
pub const ANO_MAX: i32 = 2100;

/// Organization used by the export path when no CNPJ filter is supplied
pub const DEFAULT_CNPJ: &str = "00394502000144";

/// Fourteen-digit organization identifier with punctuation removed
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cnpj(String);

impl Cnpj {
    pub fn parse(raw: &str) -> PncpResult<Self> {
        let non_digits = Regex::new(r"\D")
            .map_err(|e| PncpError::Validation(format!("Falha ao compilar regex: {}", e)))?;
        let digits = non_digits.replace_all(raw, "").into_owned();

        if digits.len() != 14 {
            return Err(PncpError::Validation(
                "CNPJ deve ter 14 dígitos".to_string(),
            ));
        }

        Ok(Self(digits))
    }

    pub fn default_organization() -> Self {
        Self(DEFAULT_CNPJ.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn validate_sequencial(sequencial: i64) -> PncpResult<i64> {
    if !(SEQUENCIAL_MIN..=SEQUENCIAL_MAX).contains(&sequencial) {
        return Err(PncpError::Validation(
            "Sequencial deve ter até 10 dígitos".to_string(),
        ));
    }
    Ok(sequencial)
}

pub fn validate_ano(ano: i32) -> PncpResult<i32> {
    if !(ANO_MIN..=ANO_MAX).contains(&ano) {
        return Err(PncpError::Validation("Ano inválido".to_string()));
    }
    Ok(ano)
}

/// Identifies one procurement: organization, purchase sequence and year
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseKey {
    pub cnpj: Cnpj,
    pub sequencial: i64,
    pub ano: i32,
}

impl PurchaseKey {
    pub fn new(cnpj: &str, sequencial: i64, ano: i32) -> PncpResult<Self> {
        Ok(Self {
            cnpj: Cnpj::parse(cnpj)?,
            sequencial: validate_sequencial(sequencial)?,
            ano: validate_ano(ano)?,
        })
    }
}

impl fmt::Display for PurchaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cnpj, self.ano, self.sequencial)
    }
}

/// One validated spreadsheet line, ready to be persisted
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDescription {
    pub item: i32,
    pub catalogo: Option<String>,
    pub descricao: Option<String>,
    pub descricao_detalhada: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub message: String,
    pub quantidade_itens: usize,
    pub itens_importados: usize,
}

impl ImportSummary {
    pub fn imported(count: usize) -> Self {
        Self {
            message: "Arquivo importado com sucesso".to_string(),
            quantidade_itens: count,
            itens_importados: count,
        }
    }
}
