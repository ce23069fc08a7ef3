// Prints which build of the library this binary was linked against, for bug
// reports and deployment checks. Run with `RUST_LOG=debug` to see the
// library's own log output.

use bigquery_version::{version, version_string, NAMESPACE};

fn main() {
    env_logger::init();
    println!("{}", version_string());
    println!("{}", NAMESPACE);
    println!("{}", version());
}
