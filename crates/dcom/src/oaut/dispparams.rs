//! DISPPARAMS and EXCEPINFO (MS-OAUT 2.2.32, 2.2.36)

use midl_ndr::{wire_count, NdrDecode, NdrEncode, NdrReader, NdrWriter};

use super::{Bstr, Variant};

/// Arguments of `IDispatch::Invoke`.
///
/// Wire form:
/// ```text
/// rgvarg:            unique pointer -> [cArgs] unique pointers to VARIANT
/// rgdispidNamedArgs: unique pointer -> [cNamedArgs] DISPID
/// cArgs:             u32
/// cNamedArgs:        u32
/// ```
/// Empty argument lists go out as null pointers.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DispatchParams {
    /// Arguments, in reverse order as IDispatch expects
    pub args: Vec<Option<Variant>>,
    /// DISPIDs of the named arguments
    pub named_args: Vec<i32>,
}

impl NdrEncode for DispatchParams {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_align(4);
        let args = &self.args;
        if args.is_empty() {
            w.write_null_pointer();
        } else {
            w.write_pointer(move |w| {
                w.write_size(args.len())?;
                w.write_unique_array(args, args.len());
                Ok(())
            });
        }
        let named = &self.named_args;
        if named.is_empty() {
            w.write_null_pointer();
        } else {
            w.write_pointer(move |w| w.write_conformant_array(named));
        }
        w.write_data(wire_count(self.args.len(), "DISPPARAMS.cArgs")?);
        w.write_data(wire_count(self.named_args.len(), "DISPPARAMS.cNamedArgs")?);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for DispatchParams {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self { args, named_args } = self;
        r.read_align(4)?;
        r.read_pointer(args, |r, args| {
            let count = r.read_size()?;
            r.read_unique_array(args, count, "rgvarg")
        })?;
        r.read_pointer(named_args, |r, named| {
            *named = r.read_conformant_array("rgdispidNamedArgs")?;
            Ok(())
        })?;
        // cArgs and cNamedArgs restate the conformance of the arrays above
        let _args_count: u32 = r.read_data()?;
        let _named_count: u32 = r.read_data()?;
        Ok(())
    }
}

/// Exception details returned by `IDispatch::Invoke`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ExcepInfo {
    pub code: u16,
    pub reserved: u16,
    pub source: Option<Bstr>,
    pub description: Option<Bstr>,
    pub help_file: Option<Bstr>,
    pub help_context: u32,
    pub reserved2: u32,
    pub deferred_fill_in: u32,
    /// SCODE describing the error
    pub scode: i32,
}

impl NdrEncode for ExcepInfo {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_align(4);
        w.write_data(self.code);
        w.write_data(self.reserved);
        w.write_unique(self.source.as_ref());
        w.write_unique(self.description.as_ref());
        w.write_unique(self.help_file.as_ref());
        w.write_data(self.help_context);
        w.write_data(self.reserved2);
        w.write_data(self.deferred_fill_in);
        w.write_data(self.scode);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for ExcepInfo {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let Self {
            code,
            reserved,
            source,
            description,
            help_file,
            help_context,
            reserved2,
            deferred_fill_in,
            scode,
        } = self;
        r.read_align(4)?;
        *code = r.read_data()?;
        *reserved = r.read_data()?;
        r.read_unique(source)?;
        r.read_unique(description)?;
        r.read_unique(help_file)?;
        *help_context = r.read_data()?;
        *reserved2 = r.read_data()?;
        *deferred_fill_in = r.read_data()?;
        *scode = r.read_data()?;
        Ok(())
    }
}

impl ExcepInfo {
    /// Exception carrying only a description and an SCODE
    pub fn new(description: &str, scode: i32) -> Self {
        Self {
            description: Some(Bstr::from(description)),
            scode,
            ..Self::default()
        }
    }
}
