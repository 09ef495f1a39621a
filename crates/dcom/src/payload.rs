//! Reusable request/response payloads
//!
//! Many DCOM methods carry nothing but the ORPC header and one value each
//! way (property accessors, parameterless actions). These generic payloads
//! cover them; methods with richer signatures define their own.

use std::fmt;

use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

use crate::operation::{Payload, ResponsePayload};
use crate::types::{Hresult, OrpcThat, OrpcThis};

/// A top-level method parameter.
///
/// Scalars are written inline. `Option<T>` is a unique pointer whose body
/// is flushed right after the parameter, which is how BSTR, VARIANT and
/// interface pointer parameters travel.
pub trait Param: Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn encode_param<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()>;
    fn decode_param<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()>;
}

macro_rules! scalar_param {
    ($($ty:ty),*) => {
        $(
            impl Param for $ty {
                fn encode_param<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
                    w.write_data(*self);
                    Ok(())
                }

                fn decode_param<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
                    *self = r.read_data()?;
                    Ok(())
                }
            }
        )*
    };
}

scalar_param!(i16, u16, i32, u32);

impl<T> Param for Option<T>
where
    T: NdrEncode + NdrDecode + Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn encode_param<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_unique(self.as_ref());
        w.write_deferred()
    }

    fn decode_param<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_unique(self)?;
        r.read_deferred()
    }
}

/// Encode the ORPCTHIS header as the first parameter
pub fn encode_this<'a>(this: &'a OrpcThis, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
    this.ndr_encode(w)?;
    w.write_deferred()
}

pub fn decode_this<'a>(this: &'a mut OrpcThis, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
    this.ndr_decode(r)?;
    r.read_deferred()
}

/// Encode the ORPCTHAT header as the first response field
pub fn encode_that<'a>(that: &'a OrpcThat, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
    that.ndr_encode(w)?;
    w.write_deferred()
}

pub fn decode_that<'a>(that: &'a mut OrpcThat, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
    that.ndr_decode(r)?;
    r.read_deferred()
}

/// Request carrying only the ORPC header
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrpcRequest {
    pub orpc_this: OrpcThis,
}

impl OrpcRequest {
    pub fn new() -> Self {
        Self {
            orpc_this: OrpcThis::new(),
        }
    }
}

impl NdrEncode for OrpcRequest {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)
    }
}

impl NdrDecode for OrpcRequest {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        decode_this(&mut self.orpc_this, r)
    }
}

impl Payload for OrpcRequest {}

/// Response carrying only the ORPC header and `Return`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrpcResponse {
    pub orpc_that: OrpcThat,
    pub hresult: i32,
}

impl OrpcResponse {
    pub fn new(hresult: Hresult) -> Self {
        Self {
            orpc_that: OrpcThat::default(),
            hresult: hresult.0,
        }
    }
}

impl NdrEncode for OrpcResponse {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl NdrDecode for OrpcResponse {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        decode_that(&mut self.orpc_that, r)?;
        self.hresult = r.read_data()?;
        Ok(())
    }
}

impl Payload for OrpcResponse {}

impl ResponsePayload for OrpcResponse {
    fn return_code(&self) -> Hresult {
        Hresult(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.0;
    }
}

/// Request carrying the ORPC header and one value (property setters)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueRequest<T> {
    pub orpc_this: OrpcThis,
    pub value: T,
}

impl<T: Param> ValueRequest<T> {
    pub fn new(value: T) -> Self {
        Self {
            orpc_this: OrpcThis::new(),
            value,
        }
    }
}

impl<T: Param> NdrEncode for ValueRequest<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_this(&self.orpc_this, w)?;
        self.value.encode_param(w)
    }
}

impl<T: Param> NdrDecode for ValueRequest<T> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self { orpc_this, value } = self;
        decode_this(orpc_this, r)?;
        value.decode_param(r)
    }
}

impl<T: Param> Payload for ValueRequest<T> {}

/// Response carrying one value and `Return` (property getters)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueResponse<T> {
    pub orpc_that: OrpcThat,
    pub value: T,
    pub hresult: i32,
}

impl<T: Param> ValueResponse<T> {
    pub fn new(value: T) -> Self {
        Self {
            orpc_that: OrpcThat::default(),
            value,
            hresult: 0,
        }
    }
}

impl<T: Param> NdrEncode for ValueResponse<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        encode_that(&self.orpc_that, w)?;
        self.value.encode_param(w)?;
        w.write_data(self.hresult);
        Ok(())
    }
}

impl<T: Param> NdrDecode for ValueResponse<T> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            orpc_that,
            value,
            hresult,
        } = self;
        decode_that(orpc_that, r)?;
        value.decode_param(r)?;
        *hresult = r.read_data()?;
        Ok(())
    }
}

impl<T: Param> Payload for ValueResponse<T> {}

impl<T: Param> ResponsePayload for ValueResponse<T> {
    fn return_code(&self) -> Hresult {
        Hresult(self.hresult)
    }

    fn set_return_code(&mut self, code: Hresult) {
        self.hresult = code.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oaut::{Bstr, Variant};
    use midl_ndr::NdrContext;

    fn roundtrip<P: Payload>(payload: &P) -> P {
        let mut w = NdrWriter::new(NdrContext::new());
        payload.ndr_encode(&mut w).unwrap();
        let bytes = w.into_bytes().unwrap();

        let mut decoded = P::default();
        let mut r = NdrReader::new(bytes, NdrContext::new());
        decoded.ndr_decode(&mut r).unwrap();
        r.finish().unwrap();
        decoded
    }

    #[test]
    fn test_value_payloads_roundtrip() {
        let request = ValueRequest::new(Some(Bstr::from("label")));
        assert_eq!(roundtrip(&request), request);

        let response = ValueResponse::new(Some(Variant::bytes(vec![9; 20])));
        assert_eq!(roundtrip(&response), response);

        let response = ValueResponse::new(-1i16);
        assert_eq!(roundtrip(&response), response);
    }

    #[test]
    fn test_orpc_response_layout() {
        let response = OrpcResponse::new(Hresult::S_FALSE);
        let mut w = NdrWriter::new(NdrContext::new());
        response.ndr_encode(&mut w).unwrap();
        let bytes = w.into_bytes().unwrap();
        // flags + null extensions + Return
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[8..], &1i32.to_le_bytes());
        assert_eq!(roundtrip(&response).return_code(), Hresult::S_FALSE);
    }
}
