use anyhow::{Context, Result, bail};
use dreamleague_sim::seed::WORD_LIST;
use dreamleague_sim::{MatchKind, encode_friendly, parse_share_code};
use std::collections::HashMap;

/// Detailed seed metadata used for scenario runs and balance analysis.
#[derive(Debug, Clone)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    pub source_kind: Option<MatchKind>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            source_kind: None,
        }
    }

    #[must_use]
    pub const fn from_share_code(seed: u64, kind: MatchKind, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            source_kind: Some(kind),
        }
    }

    #[must_use]
    pub fn share_code_for_kind(&self, kind: MatchKind) -> String {
        if let (Some(code), Some(source_kind)) = (&self.code, self.source_kind)
            && source_kind == kind
        {
            return code.clone();
        }
        encode_friendly(kind, self.seed)
    }
}

/// Resolve CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers, share codes, and `all` / `available`, which expand to every
/// share-code seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("all") || token.eq_ignore_ascii_case("available") {
            request_all = true;
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if let Some((kind, seed)) = parse_share_code(token) {
            pending.push(SeedInfo::from_share_code(seed, kind, token.to_uppercase()));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_share_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<(u64, u8), usize> = HashMap::new();

    for info in pending {
        let key = (info.seed, kind_tag(info.source_kind));
        match index.get(&key).and_then(|&slot| deduped.get_mut(slot)) {
            Some(entry) => {
                if entry.code.is_none() && info.code.is_some() {
                    *entry = info;
                }
            }
            None => {
                index.insert(key, deduped.len());
                deduped.push(info);
            }
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}

fn generate_all_share_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100 * 2);

    for word in WORD_LIST {
        for suffix in 0..100 {
            for kind in [MatchKind::Exhibition, MatchKind::Tournament] {
                let code = format!("{}-{word}{suffix:02}", kind.prefix());
                let (kind, seed) = parse_share_code(&code)
                    .with_context(|| format!("failed to parse share code: {code}"))?;
                seeds.push(SeedInfo::from_share_code(seed, kind, code));
            }
        }
    }

    Ok(seeds)
}

const fn kind_tag(kind: Option<MatchKind>) -> u8 {
    match kind {
        Some(MatchKind::Exhibition) => 1,
        Some(MatchKind::Tournament) => 2,
        None => 0,
    }
}
