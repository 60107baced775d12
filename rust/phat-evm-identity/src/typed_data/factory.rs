use super::document::{
    CertificateIssuance, ContractQuery, DocumentKind, Domain, Message, StructuredDataDocument,
};
use crate::{
    account::Account,
    bytes::HexBytes,
    constants::{ProtocolConstants, V1},
    error::{Error, Result},
};

/// Builds [`StructuredDataDocument`]s from a constant table.
///
/// Building is pure: no prompt is shown and, for given inputs, the result is
/// always identical.
#[derive(Debug, Clone, Copy)]
pub struct StructuredMessageFactory {
    constants: &'static ProtocolConstants,
}

impl Default for StructuredMessageFactory {
    fn default() -> Self {
        Self::new(&V1)
    }
}

impl StructuredMessageFactory {
    /// Create a factory over the given constant table.
    pub const fn new(constants: &'static ProtocolConstants) -> Self {
        Self { constants }
    }

    /// The `domain` record shared by both variants, differing only in name.
    pub fn domain(&self, kind: DocumentKind) -> Domain {
        let name = match kind {
            DocumentKind::CertificateIssuance => self.constants.certificate_domain_name,
            DocumentKind::ContractQuery => self.constants.query_domain_name,
        };
        Domain {
            name,
            version: self.constants.domain_version,
            salt: self.constants.domain_salt,
        }
    }

    /// Build the document authorizing issuance of `encoded_cert`, valid
    /// until `time_to_live` (a block height).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `encoded_cert` is absent (the
    /// empty string) or not hex. `"0x"` is an empty byte string.
    pub fn certificate<A: Account>(
        &self,
        account: &A,
        encoded_cert: &str,
        time_to_live: i64,
    ) -> Result<StructuredDataDocument> {
        let encoded_cert = parse_payload("encodedCert", encoded_cert)?;
        let message = Message::CertificateIssuance(CertificateIssuance {
            description: self.constants.certificate_description,
            time_to_live: self.constants.render_time_to_live(time_to_live),
            encoded_cert,
        });
        Ok(self.assemble(account, message))
    }

    /// Build the document authorizing the single query `encoded_query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `encoded_query` is absent (the
    /// empty string) or not hex. `"0x"` is an empty byte string.
    pub fn query<A: Account>(
        &self,
        account: &A,
        encoded_query: &str,
    ) -> Result<StructuredDataDocument> {
        let encoded_query = parse_payload("encodedQuery", encoded_query)?;
        let message = Message::ContractQuery(ContractQuery {
            description: self.constants.query_description,
            encoded_query,
        });
        Ok(self.assemble(account, message))
    }

    fn assemble<A: Account>(&self, account: &A, message: Message) -> StructuredDataDocument {
        let domain = self.domain(message.kind());
        StructuredDataDocument::new(domain, message, account.address())
    }
}

fn parse_payload(field: &str, payload: &str) -> Result<HexBytes> {
    if payload.is_empty() {
        return Err(Error::InvalidInput(format!("{field} is missing")));
    }
    payload
        .parse()
        .map_err(|error| Error::InvalidInput(format!("{field} is not hex: {error}")))
}

/// Build a certificate issuance document with the current constant table.
///
/// # Errors
///
/// See [`StructuredMessageFactory::certificate`].
pub fn build_certificate_document<A: Account>(
    account: &A,
    encoded_cert: &str,
    time_to_live: i64,
) -> Result<StructuredDataDocument> {
    StructuredMessageFactory::default().certificate(account, encoded_cert, time_to_live)
}

/// Build a contract query document with the current constant table.
///
/// # Errors
///
/// See [`StructuredMessageFactory::query`].
pub fn build_query_document<A: Account>(
    account: &A,
    encoded_query: &str,
) -> Result<StructuredDataDocument> {
    StructuredMessageFactory::default().query(account, encoded_query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hash::keccak256, helpers::LocalAccount, typed_data::document::FieldValue};
    use testresult::TestResult;

    const SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn account() -> LocalAccount {
        LocalAccount::from_secret(&hex::decode(SECRET).unwrap()).unwrap()
    }

    #[test]
    fn certificate_document_follows_template() -> TestResult {
        let document = build_certificate_document(&account(), "0xdeadbeef", 1_000_000)?;

        assert_eq!(document.kind(), DocumentKind::CertificateIssuance);
        assert_eq!(document.primary_type(), "IssueQueryCertificate");
        assert_eq!(document.domain().name, "Phat Query Certificate");
        assert_eq!(document.domain().version, "1");
        assert_eq!(document.domain().salt, V1.domain_salt);
        assert_eq!(document.message().description(), V1.certificate_description);
        assert_eq!(
            document.message().time_to_live(),
            Some("The Certificate will be valid till block 1000000.")
        );
        assert_eq!(
            document.message().encoded_payload(),
            [0xde, 0xad, 0xbe, 0xef]
        );
        assert_eq!(document.account(), account().address());
        Ok(())
    }

    #[test]
    fn query_document_follows_template() -> TestResult {
        let document = build_query_document(&account(), "abc123")?;

        assert_eq!(document.kind(), DocumentKind::ContractQuery);
        assert_eq!(document.primary_type(), "PhatContractQuery");
        assert_eq!(document.domain().name, "Phat Contract Query");
        assert_eq!(document.message().description(), V1.query_description);
        assert_eq!(document.message().time_to_live(), None);
        assert_eq!(document.message().encoded_payload(), [0xab, 0xc1, 0x23]);
        Ok(())
    }

    #[test]
    fn domains_differ_only_in_name() {
        let factory = StructuredMessageFactory::default();
        let certificate = factory.domain(DocumentKind::CertificateIssuance);
        let query = factory.domain(DocumentKind::ContractQuery);
        assert_ne!(certificate.name, query.name);
        assert_eq!(certificate.version, query.version);
        assert_eq!(certificate.salt, query.salt);
    }

    #[test]
    fn building_is_pure() -> TestResult {
        let account = account();
        let pairs = [
            (
                build_certificate_document(&account, "0x0102", 42)?,
                build_certificate_document(&account, "0x0102", 42)?,
            ),
            (
                build_query_document(&account, "0xabc123")?,
                build_query_document(&account, "0xabc123")?,
            ),
        ];

        for (first, second) in pairs {
            assert_eq!(first, second);
            assert_eq!(serde_json::to_vec(&first)?, serde_json::to_vec(&second)?);
            assert_eq!(first.signing_hash(), second.signing_hash());
        }
        Ok(())
    }

    #[test]
    fn payload_does_not_leak_into_domain() -> TestResult {
        let account = account();
        let first = build_query_document(&account, "0xabc123")?;
        let second = build_query_document(&account, "0xdeadbeef")?;

        assert_eq!(first.domain(), second.domain());
        assert_eq!(
            serde_json::to_vec(first.domain())?,
            serde_json::to_vec(second.domain())?
        );
        assert_eq!(first.domain_separator(), second.domain_separator());
        assert_ne!(serde_json::to_vec(&first)?, serde_json::to_vec(&second)?);

        let certificate_a = build_certificate_document(&account, "0x01", 10)?;
        let certificate_b = build_certificate_document(&account, "0x0203", 20)?;
        assert_eq!(
            serde_json::to_vec(certificate_a.domain())?,
            serde_json::to_vec(certificate_b.domain())?
        );
        Ok(())
    }

    #[test]
    fn documents_carry_the_salt_derived_from_its_preimage() -> TestResult {
        let expected = keccak256(V1.domain_salt_preimage.as_bytes());
        let account = account();

        for document in [
            build_certificate_document(&account, "0xdead", 12345)?,
            build_query_document(&account, "0xabc123")?,
        ] {
            assert_eq!(document.domain().salt.as_bytes(), &expected);
            let json = serde_json::to_value(&document)?;
            assert_eq!(
                json["domain"]["salt"],
                format!("0x{}", hex::encode(expected))
            );
        }
        Ok(())
    }

    #[test]
    fn time_to_live_edge_values_render_verbatim() -> TestResult {
        for (height, expected) in [
            (0, "The Certificate will be valid till block 0."),
            (-7, "The Certificate will be valid till block -7."),
        ] {
            let document = build_certificate_document(&account(), "0x01", height)?;
            assert_eq!(document.message().time_to_live(), Some(expected));
        }
        Ok(())
    }

    #[test]
    fn variants_do_not_borrow_each_others_fields() -> TestResult {
        let certificate = build_certificate_document(&account(), "0x01", 1)?;
        let query = build_query_document(&account(), "0x01")?;

        let certificate_json = serde_json::to_value(&certificate)?;
        let query_json = serde_json::to_value(&query)?;
        assert!(certificate_json["message"].get("encodedQuery").is_none());
        assert!(query_json["message"].get("encodedCert").is_none());
        assert!(query_json["message"].get("timeToLive").is_none());
        assert!(query_json["types"].get("IssueQueryCertificate").is_none());
        assert!(certificate_json["types"].get("PhatContractQuery").is_none());
        Ok(())
    }

    #[test]
    fn message_values_carry_the_payload() -> TestResult {
        let document = build_query_document(&account(), "0xff00")?;
        assert_eq!(
            document.message().values()[1],
            FieldValue::Bytes(&[0xff, 0x00])
        );
        Ok(())
    }

    #[test]
    fn empty_hex_is_an_empty_payload() -> TestResult {
        let query = build_query_document(&account(), "0x")?;
        assert!(query.message().encoded_payload().is_empty());
        assert_eq!(
            serde_json::to_value(&query)?["message"]["encodedQuery"],
            "0x"
        );

        let certificate = build_certificate_document(&account(), "0x", 1)?;
        assert!(certificate.message().encoded_payload().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_malformed_payloads() {
        let account = account();
        for payload in ["", "0xabc", "zz", "0xgg"] {
            assert!(matches!(
                build_query_document(&account, payload),
                Err(Error::InvalidInput(_))
            ));
            assert!(matches!(
                build_certificate_document(&account, payload, 1),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn hashes_match_golden_values() -> TestResult {
        let certificate = build_certificate_document(&account(), "0xdead", 12345)?;
        let query = build_query_document(&account(), "0xabc123")?;

        assert_eq!(
            hex::encode(certificate.domain_separator()),
            "681b32fdbfb15141f48012891b2ab3064e37a72053ef9c148a8d939138a51db7"
        );
        assert_eq!(
            hex::encode(query.domain_separator()),
            "8f7b0d6c0bed15d8dcba4576310b6b38261f0bcc0f132ed7eaae6bcc5dabe302"
        );
        assert_eq!(
            hex::encode(certificate.signing_hash()),
            "232e83cd50f95c5248e18215b3af319fa86697fa0b5f75201a3bb502ef22e8cd"
        );
        assert_eq!(
            hex::encode(query.signing_hash()),
            "327b76864d577d09cde7273f8c92a8547a66c11b96edf7b9cb5b2c222c249d14"
        );
        Ok(())
    }
}
