//! Typed-data documents as a wallet sees them.

use phat_evm_identity::{
    Account, EthAddress, RecoverableSignature, SignerError, TypedDataSigner,
    build_certificate_document, build_query_document, error::Error, helpers::LocalAccount,
    recovery::recover_verifying_key, request_signature, typed_data::StructuredDataDocument,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use testresult::TestResult;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use wasm_bindgen_test::wasm_bindgen_test;

const SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

const SALT: &str = "0x0ea813d1592526d672ea2576d7a07914cef2ca301b35c5eed941f7c897512a00";
const ACCOUNT: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

fn local() -> LocalAccount {
    LocalAccount::from_secret(&hex::decode(SECRET).unwrap()).unwrap()
}

/// A typed-data signer that always refuses.
struct RefusingSigner {
    address: EthAddress,
    prompts: AtomicUsize,
}

impl Account for RefusingSigner {
    fn address(&self) -> EthAddress {
        self.address
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<RecoverableSignature, SignerError> {
        Err(SignerError::Cancelled)
    }
}

impl TypedDataSigner for RefusingSigner {
    async fn sign_typed_data(
        &self,
        _document: &StructuredDataDocument,
    ) -> Result<RecoverableSignature, SignerError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Err(SignerError::Rejected("user rejected the request".into()))
    }
}

#[test]
fn certificate_document_serializes_in_wallet_shape() -> TestResult {
    let document = build_certificate_document(&local(), "0xDEAD", 12345)?;

    let expected = format!(
        concat!(
            r#"{{"domain":{{"name":"Phat Query Certificate","version":"1","salt":"{salt}"}},"#,
            r#""primaryType":"IssueQueryCertificate","#,
            r#""types":{{"EIP712Domain":[{{"name":"name","type":"string"}},{{"name":"version","type":"string"}},{{"name":"salt","type":"bytes32"}}],"#,
            r#""IssueQueryCertificate":[{{"name":"description","type":"string"}},{{"name":"timeToLive","type":"string"}},{{"name":"encodedCert","type":"bytes"}}]}},"#,
            r#""message":{{"description":"You are signing a Certificate that can be used to query Phat Contracts using your identity without further prompts.","#,
            r#""timeToLive":"The Certificate will be valid till block 12345.","encodedCert":"0xdead"}},"#,
            r#""account":"{account}"}}"#,
        ),
        salt = SALT,
        account = ACCOUNT,
    );
    assert_eq!(serde_json::to_string(&document)?, expected);
    Ok(())
}

#[test]
fn query_document_serializes_in_wallet_shape() -> TestResult {
    let document = build_query_document(&local(), "abc123")?;

    let expected = format!(
        concat!(
            r#"{{"domain":{{"name":"Phat Contract Query","version":"1","salt":"{salt}"}},"#,
            r#""primaryType":"PhatContractQuery","#,
            r#""types":{{"EIP712Domain":[{{"name":"name","type":"string"}},{{"name":"version","type":"string"}},{{"name":"salt","type":"bytes32"}}],"#,
            r#""PhatContractQuery":[{{"name":"description","type":"string"}},{{"name":"encodedQuery","type":"bytes"}}]}},"#,
            r#""message":{{"description":"You are signing a query request that would be sent to a Phat Contract.","#,
            r#""encodedQuery":"0xabc123"}},"#,
            r#""account":"{account}"}}"#,
        ),
        salt = SALT,
        account = ACCOUNT,
    );
    assert_eq!(serde_json::to_string(&document)?, expected);
    Ok(())
}

#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), tokio::test)]
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
async fn signed_documents_recover_to_the_signer() -> TestResult {
    let local = local();
    let documents = [
        build_certificate_document(&local, "0xdead", 12345)?,
        build_query_document(&local, "0xabc123")?,
    ];

    for document in &documents {
        let signature = request_signature(&local, document).await?;
        let key = recover_verifying_key(&document.signing_hash(), &signature)?;
        assert_eq!(EthAddress::from_verifying_key(&key), local.address());
    }
    Ok(())
}

#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), tokio::test)]
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
async fn refused_document_is_signing_declined() -> TestResult {
    let signer = RefusingSigner {
        address: local().address(),
        prompts: AtomicUsize::new(0),
    };
    let document = build_query_document(&signer, "0x01")?;

    let result = request_signature(&signer, &document).await;
    assert_eq!(
        result,
        Err(Error::SigningDeclined(SignerError::Rejected(
            "user rejected the request".into()
        )))
    );
    assert_eq!(signer.prompts.load(Ordering::SeqCst), 1);
    Ok(())
}
