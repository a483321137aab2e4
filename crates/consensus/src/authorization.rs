use chainrpc_primitives::{Address, ChainId, Parity, Signature, U256};
use chainrpc_rlp::{Decodable, Encodable, Header, RlpError, RlpResult};

/// An unsigned EIP-7702 authorization: a delegation from `address`'s code
/// to be installed on the signer's account, bound to a chain and nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Authorization {
    /// Chain the authorization is valid on; `0` means any chain.
    pub chain_id: ChainId,
    /// The contract address whose code is delegated to.
    pub address: Address,
    /// The authorizing account's nonce at signing time.
    pub nonce: u64,
}

impl Authorization {
    fn fields_len(&self) -> usize {
        self.chain_id.length() + self.address.length() + self.nonce.length()
    }

    fn encode_fields(&self, out: &mut dyn bytes::BufMut) {
        self.chain_id.encode(out);
        self.address.encode(out);
        self.nonce.encode(out);
    }

    /// Wraps this authorization with a `(y_parity, r, s)` signature over its
    /// RLP-encoded fields.
    pub fn into_signed(self, signature: Signature) -> SignedAuthorization {
        SignedAuthorization { inner: self, signature }
    }
}

impl Encodable for Authorization {
    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        Header { list: true, payload_length }.length() + payload_length
    }

    fn encode(&self, out: &mut dyn bytes::BufMut) {
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.encode_fields(out);
    }
}

impl Decodable for Authorization {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        let chain_id = ChainId::decode(&mut payload)?;
        let address = Address::decode(&mut payload)?;
        let nonce = u64::decode(&mut payload)?;
        if !payload.is_empty() {
            return Err(RlpError::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - payload.len(),
            });
        }
        *buf = rest;
        Ok(Self { chain_id, address, nonce })
    }
}

/// An [`Authorization`] together with the signature the authorizing account
/// produced over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    /// The authorization payload.
    pub inner: Authorization,
    /// The authorizing account's signature.
    pub signature: Signature,
}

impl SignedAuthorization {
    fn signature_fields_len(&self) -> usize {
        let (parity, _) = self.signature.parity().expect("signature has valid v");
        let y_parity = parity.0 as u64;
        y_parity.length() + self.signature.r().length() + self.signature.s().length()
    }

    /// Recovers the address that produced this authorization's signature,
    /// over the RLP encoding of its [`Authorization`] fields.
    pub fn recover_authority(&self) -> Result<Address, chainrpc_primitives::SignatureError> {
        let hash = chainrpc_primitives::keccak256(chainrpc_rlp::encode_to_vec(&self.inner));
        self.signature.recover_address_from_prehash(&hash)
    }
}

impl Encodable for SignedAuthorization {
    fn length(&self) -> usize {
        let payload_length = self.inner.fields_len() + self.signature_fields_len();
        Header { list: true, payload_length }.length() + payload_length
    }

    fn encode(&self, out: &mut dyn bytes::BufMut) {
        let payload_length = self.inner.fields_len() + self.signature_fields_len();
        Header { list: true, payload_length }.encode(out);
        self.inner.encode_fields(out);
        let (parity, _) = self.signature.parity().expect("signature has valid v");
        (parity.0 as u64).encode(out);
        self.signature.r().encode(out);
        self.signature.s().encode(out);
    }
}

impl Decodable for SignedAuthorization {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        let chain_id = ChainId::decode(&mut payload)?;
        let address = Address::decode(&mut payload)?;
        let nonce = u64::decode(&mut payload)?;
        let y_parity = u64::decode(&mut payload)?;
        let r = U256::decode(&mut payload)?;
        let s = U256::decode(&mut payload)?;
        if !payload.is_empty() {
            return Err(RlpError::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - payload.len(),
            });
        }
        *buf = rest;
        let v = Parity(y_parity == 1).to_electrum_v();
        Ok(Self { inner: Authorization { chain_id, address, nonce }, signature: Signature::new(r, s, v) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_signed_authorization() {
        let auth = Authorization { chain_id: 1, address: Address::from([9u8; 20]), nonce: 4 };
        let signed = auth.into_signed(Signature::new(U256::from(1u64), U256::from(2u64), 28));
        let mut buf = Vec::new();
        signed.encode(&mut buf);
        assert_eq!(buf.len(), signed.length());
        let mut slice = buf.as_slice();
        let decoded = SignedAuthorization::decode(&mut slice).unwrap();
        assert!(slice.is_empty());
        assert_eq!(decoded.inner, signed.inner);
    }
}
