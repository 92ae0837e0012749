//! Print the SplunkToken CustomResourceDefinition as YAML
//!
//! ```bash
//! cargo run --bin crdgen > deploy/crds/splunktoken.yaml
//! ```

use kube::CustomResourceExt;
use splunk_token_operator::crd::SplunkToken;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&SplunkToken::crd())?);
    Ok(())
}
