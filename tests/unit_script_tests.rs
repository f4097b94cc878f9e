//! # Script Synthesis Unit Tests / 脚本合成单元测试

mod common;

use box_matrix::config::{Config, ConfigTree};
use box_matrix::core::environment::expand;
use box_matrix::core::facets::resolve;
use box_matrix::core::script::{ProvisionScript, synthesize};

fn scripts(yaml: &str, setup: &str) -> Vec<ProvisionScript> {
    let config = Config::from_tree(&ConfigTree::from_yaml_str(yaml).unwrap()).unwrap();
    let chain = resolve(&config, setup).unwrap();
    let combinations = expand(&chain);
    combinations.iter().map(|c| synthesize(&chain, &c)).collect()
}

#[test]
fn test_scenario_scripts() {
    let scripts = scripts(common::SCENARIO_A, "t1");
    assert_eq!(scripts.len(), 2);

    assert_eq!(
        scripts[0].body,
        "set -e\n\nX=1\necho A\nsu vagrant -c \"cd && run-tests\"\n"
    );
    assert_eq!(
        scripts[1].body,
        "set -e\n\nX=2\necho A\nsu vagrant -c \"cd && run-tests\"\n"
    );
    assert_eq!(scripts[0].customize, "");
}

#[test]
fn test_install_and_script_steps_follow_chain_order() {
    let scripts = scripts(
        r#"
.a:
  install: [ia]
  script: [sa]
.b:
  install: [ib]
  script: [sb]
t1:
  box: ubuntu
  using: [.b, .a]
  install: [it]
  script: [st]
"#,
        "t1",
    );
    let body = &scripts[0].body;

    assert!(body.contains("ib\nia\nit\n"));
    assert!(body.ends_with("su vagrant -c \"cd && sb && sa && st\"\n"));
}

#[test]
fn test_no_script_steps_means_no_su_line() {
    let scripts = scripts("t1:\n  box: ubuntu\n  install: [make]\n", "t1");
    assert_eq!(scripts[0].body, "set -e\n\nmake\n");
    assert!(!scripts[0].body.contains("su "));
}

#[test]
fn test_script_steps_are_quoted() {
    let scripts = scripts(
        "t1:\n  box: ubuntu\n  script: ['echo \"hi\" > out', 'echo $HOME']\n",
        "t1",
    );
    assert!(
        scripts[0]
            .body
            .contains(r#"su vagrant -c "cd && echo \"hi\" > out && echo $HOME""#)
    );
}

#[test]
fn test_customize_block() {
    let scripts = scripts(
        r#"
.mem:
  customize: ['["modifyvm", :id, "--memory", "1024"]']
t1:
  box: ubuntu
  using: .mem
  customize: ['["modifyvm", :id, "--cpus", "2"]', '']
"#,
        "t1",
    );
    assert_eq!(
        scripts[0].customize,
        "    vb.customize [\"modifyvm\", :id, \"--memory\", \"1024\"]\n    vb.customize [\"modifyvm\", :id, \"--cpus\", \"2\"]"
    );
}

#[test]
fn test_synthesis_is_deterministic() {
    let first = scripts(common::SCENARIO_A, "t1");
    let second = scripts(common::SCENARIO_A, "t1");
    assert_eq!(first, second);
}
