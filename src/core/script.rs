//! # Script Synthesizer / 脚本合成器
//!
//! Builds the provisioning script of one run from its facet chain and
//! environment combination. The script:
//!
//! 1. stops at the first failing command (`set -e`);
//! 2. sets the chosen environment line of every facet;
//! 3. runs every `install` step as the provisioning user;
//! 4. runs every `script` step as [`PROVISION_USER`] through `su -c`.
//!
//! 根据 facet 链和环境组合构建单次运行的配置脚本。
//! `install` 步骤以配置用户身份运行，`script` 步骤通过 `su -c` 以普通用户身份运行。

use crate::core::environment::Combination;
use crate::core::facets::FacetChain;

/// The unprivileged account running the `script` steps on the machine.
/// 在虚拟机上运行 `script` 步骤的非特权账户。
pub const PROVISION_USER: &str = "vagrant";

/// Variable the provider block of the descriptor template is bound to.
pub const PROVIDER_VAR: &str = "vb";

/// The synthesized script body and provider customization block of a run.
/// 单次运行合成的脚本内容和提供者自定义块。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionScript {
    pub body: String,
    pub customize: String,
}

/// Synthesizes the script of one run. Identical inputs always produce
/// byte-identical output.
///
/// 合成单次运行的脚本。相同的输入总是产生逐字节相同的输出。
pub fn synthesize(chain: &FacetChain<'_>, combination: &Combination<'_>) -> ProvisionScript {
    let mut lines: Vec<String> = vec!["set -e".to_string()];
    lines.extend(combination.lines.iter().map(|line| line.to_string()));
    lines.extend(chain.iter().flat_map(|facet| facet.install.iter().cloned()));

    let steps: Vec<&str> = chain
        .iter()
        .flat_map(|facet| facet.script.iter().map(String::as_str))
        .collect();
    if !steps.is_empty() {
        let command = std::iter::once("cd")
            .chain(steps)
            .collect::<Vec<_>>()
            .join(" && ");
        lines.push(format!("su {PROVISION_USER} -c {}", double_quote(&command)));
    }

    let mut body = lines.join("\n");
    body.push('\n');

    let customize = chain
        .iter()
        .flat_map(|facet| facet.customize.iter())
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| format!("    {PROVIDER_VAR}.customize {entry}"))
        .collect::<Vec<_>>()
        .join("\n");

    ProvisionScript { body, customize }
}

/// Wraps `text` in double quotes, escaping backslashes and embedded quotes.
/// `$` and backquotes are left alone so variables still expand.
fn double_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
