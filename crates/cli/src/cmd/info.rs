use modplan_lib::{Configuration, Environment, Platform};

use crate::output::print_stat;

pub fn cmd_info() {
  let host = Environment::host(Configuration::default());

  println!("System:");
  print_stat("Platform", host.platform.as_str());
  print_stat("Architecture", host.architecture.as_str());
  print_stat("Configuration", host.configuration.as_str());

  let known: Vec<String> = Platform::known()
    .iter()
    .map(|p| format!("{} ({})", p, p.default_architecture()))
    .collect();
  println!();
  println!("Known platforms:");
  for platform in known {
    println!("  {}", platform);
  }
}
