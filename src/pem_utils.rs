/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert a PEM‑encoded string to DER‑encoded bytes.
pub fn pem_to_der(pem_str: &str) -> Result<Vec<u8>, pem::PemError> {
    let pem = pem::parse(pem_str)?;
    Ok(pem.contents().to_vec())
}

/// Split a concatenation of PEM blocks into `(label, der)` pairs, in order.
pub fn split_pem_bundle(bundle: &[u8]) -> Result<Vec<(String, Vec<u8>)>, pem::PemError> {
    Ok(pem::parse_many(bundle)?
        .into_iter()
        .map(|block| (block.tag().to_string(), block.into_contents()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_keeps_block_order() {
        let mut bundle = der_to_pem(&[1, 2, 3], "PRIVATE KEY");
        bundle.push_str(&der_to_pem(&[4, 5], "CERTIFICATE"));
        bundle.push_str(&der_to_pem(&[6], "CERTIFICATE"));

        let blocks = split_pem_bundle(bundle.as_bytes()).unwrap();
        let labels: Vec<&str> = blocks.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, ["PRIVATE KEY", "CERTIFICATE", "CERTIFICATE"]);
        assert_eq!(blocks[1].1, vec![4, 5]);
        assert_eq!(pem_to_der(&der_to_pem(&[9, 9], "CERTIFICATE")).unwrap(), vec![9, 9]);
    }
}
