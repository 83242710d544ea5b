use crate::domain::model::Inputs;
use crate::utils::error::Result;
use url::{form_urlencoded, Url};

/// 只輸出非零欄位，欄位順序固定
pub fn encode_query(inputs: &Inputs) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in inputs.fields() {
        if value != 0.0 {
            serializer.append_pair(name, &format_number(value));
        }
    }
    serializer.finish()
}

/// 取 Display 與指數表示中較短者，兩者都能精確還原
fn format_number(value: f64) -> String {
    let plain = value.to_string();
    let scientific = format!("{:e}", value);
    if scientific.len() < plain.len() {
        scientific
    } else {
        plain
    }
}

/// Replaces the query of `base` with the encoded inputs. An all-zero input
/// record produces a link with no query at all.
pub fn encode_state_to_url(base: &Url, inputs: &Inputs) -> Url {
    let mut url = base.clone();
    let query = encode_query(inputs);
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&query));
    }
    url
}

pub fn encode_state_to_url_str(base: &str, inputs: &Inputs) -> Result<String> {
    let base = Url::parse(base)?;
    Ok(encode_state_to_url(&base, inputs).to_string())
}

/// Accepts a full link or a bare query string (leading `?` optional).
/// Unknown keys and values that are not finite numbers are skipped.
pub fn decode_state_from_url(link: &str) -> Inputs {
    let link = link.trim();
    let query = match Url::parse(link) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => {
            let query = link.split_once('#').map_or(link, |(query, _)| query);
            query.trim_start_matches('?').to_string()
        }
    };

    let mut inputs = Inputs::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Some(slot) = inputs.field_mut(&key) else {
            tracing::debug!("Ignoring unknown share-link key: {}", key);
            continue;
        };
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => *slot = number,
            _ => tracing::debug!("Ignoring unparsable value for {}: {}", key, value),
        }
    }
    inputs
}
