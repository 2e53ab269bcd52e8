// src/common/ids.rs

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 9;

/// Gera o ID de um documento no formato `prefixo_timestampMillis_aleatorio`.
/// Ex: `prop_1718035200000_k3j9x0a2b`
pub fn document_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}
