//! EIP-712 documents authorizing Phat query certificates and contract
//! queries.
//!
//! [`StructuredMessageFactory`] builds the documents; an external
//! [`TypedDataSigner`] signs them. Building is pure and synchronous, signing
//! is interactive.

pub mod document;
pub mod encode;
mod factory;

pub use document::{
    CertificateIssuance, ContractQuery, DocumentKind, Domain, FieldType, Message,
    StructuredDataDocument, TypedField,
};
pub use factory::*;

use crate::{
    account::{RecoverableSignature, TypedDataSigner},
    error::Result,
};

/// Hand `document` to `signer` for signing.
///
/// Triggers exactly one signing prompt.
///
/// # Errors
///
/// Returns [`Error::SigningDeclined`] if the signer does not produce a
/// signature.
///
/// [`Error::SigningDeclined`]: crate::Error::SigningDeclined
pub async fn request_signature<S: TypedDataSigner>(
    signer: &S,
    document: &StructuredDataDocument,
) -> Result<RecoverableSignature> {
    tracing::debug!(
        account = %document.account(),
        primary_type = document.primary_type(),
        "requesting typed-data signature"
    );
    Ok(signer.sign_typed_data(document).await?)
}
