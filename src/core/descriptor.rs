//! # VM Descriptor Template / 虚拟机描述文件模板
//!
//! The descriptor (a `Vagrantfile`) is rendered from a text template with
//! three placeholders: `{box}`, `{customize}` and `{test}`. `{{` and `}}`
//! stand for literal braces; any other `{name}` is kept as written.
//!
//! 描述文件（`Vagrantfile`）由包含三个占位符的文本模板渲染：
//! `{box}`、`{customize}` 和 `{test}`。`{{` 和 `}}` 表示字面大括号；
//! 其他 `{name}` 原样保留。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File name of the rendered descriptor in the working directory.
pub const DESCRIPTOR_FILE: &str = "Vagrantfile";

/// Directory where the backend keeps the state of the machine.
pub const STATE_DIR: &str = ".vagrant";

/// Built-in template used unless `--vagrant-file` is given.
pub const DEFAULT_TEMPLATE: &str = r#"VAGRANTFILE_API_VERSION = "2"

Vagrant.configure(VAGRANTFILE_API_VERSION) do |config|
  config.vm.box = "{box}"
  config.vm.provider :virtualbox do |vb|
{customize}
  end
  config.vm.provision :shell, path: "{test}"
end
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorTemplate {
    text: String,
}

impl Default for DescriptorTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl DescriptorTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads a user supplied template.
    /// 读取用户提供的模板。
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor template {}", path.display()))?;
        Ok(Self::new(text))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fills in the image reference, the customization block and the path
    /// of the provisioning script.
    ///
    /// 填入镜像引用、自定义块和配置脚本路径。
    pub fn render(&self, box_ref: &str, customize: &str, script_file: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + customize.len() + box_ref.len());
        let mut rest = self.text.as_str();
        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];
            if rest.starts_with("{{") || rest.starts_with("}}") {
                out.push_str(&rest[..1]);
                rest = &rest[2..];
                continue;
            }
            if rest.starts_with('}') {
                out.push('}');
                rest = &rest[1..];
                continue;
            }
            let replacement = rest.find('}').and_then(|end| {
                let value = match &rest[1..end] {
                    "box" => box_ref,
                    "customize" => customize,
                    "test" => script_file,
                    _ => return None,
                };
                Some((value, end))
            });
            match replacement {
                Some((value, end)) => {
                    out.push_str(value);
                    rest = &rest[end + 1..];
                }
                None => {
                    out.push_str(&rest[..1]);
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
