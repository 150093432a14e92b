//! Writes a root CA, an intermediate CA and a server certificate to the current directory.
//!
//! Run with `RUST_LOG=trustkit=debug` to see each certificate as it is created.

use tracing_subscriber::EnvFilter;
use trustkit::CertificateAuthority;

fn main() -> trustkit::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let root = CertificateAuthority::new()?;
    let intermediate = root.create_child_ca()?;
    let server = intermediate.issue_server_cert(["localhost", "127.0.0.1", "::1"])?;

    root.cert_pem().write_to_path("ca.pem", false)?;
    server
        .private_key_and_cert_chain_pem()
        .write_to_path("server.pem", false)?;

    println!("Root CA certificate:\n{}", root.cert_pem().as_str()?);
    println!("Server key and chain written to server.pem");
    Ok(())
}
