//! Callee signatures and the default overload resolver.
use std::fmt::{self, Write};

use cadenza_ir::{IrNode, SourcePos, Type};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::{services::SignatureResolver, CodegenError, FuncContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignature {
    pub name: String,
    /// Four-byte selector of the function.
    pub method_id: u32,
    pub args: Vec<Type>,
    pub output_type: Option<Type>,
    pub is_constant: bool,
    pub is_private: bool,
    /// Estimated gas of executing the callee body.
    pub gas: u64,
}

impl CallSignature {
    /// Creates a public, non-constant signature without output.
    pub fn new(name: &str, method_id: u32, args: Vec<Type>) -> Self {
        Self {
            name: name.to_string(),
            method_id,
            args,
            output_type: None,
            is_constant: false,
            is_private: false,
            gas: 0,
        }
    }

    pub fn with_output(mut self, ty: Type) -> Self {
        self.output_type = Some(ty);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_constant = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_types(f, self.args.iter())?;
        write!(f, ")")
    }
}

/// Signatures of the functions declared in a contract, grouped by name.
#[derive(Debug, Default)]
pub struct SignatureTable {
    sigs: IndexMap<String, SmallVec<[CallSignature; 1]>>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sig: CallSignature) {
        self.sigs.entry(sig.name.clone()).or_default().push(sig);
    }

    pub fn overloads(&self, name: &str) -> &[CallSignature] {
        self.sigs
            .get(name)
            .map(|sigs| sigs.as_slice())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallSignature> {
        self.sigs.values().flatten()
    }
}

/// Resolves a call against a [`SignatureTable`] by matching argument count and
/// argument types exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableResolver;

impl SignatureResolver for TableResolver {
    fn lookup(
        &self,
        sigs: &SignatureTable,
        method: &str,
        args: &[IrNode],
        _pos: Option<SourcePos>,
        _ctx: &FuncContext,
    ) -> Result<CallSignature, CodegenError> {
        let candidates = sigs.overloads(method);
        let matched = candidates.iter().find(|sig| {
            sig.args.len() == args.len()
                && sig
                    .args
                    .iter()
                    .zip(args)
                    .all(|(expected, arg)| arg.value_type() == Some(expected))
        });

        if let Some(sig) = matched {
            return Ok(sig.clone());
        }

        let detail = if candidates.is_empty() {
            "function is not declared".to_string()
        } else {
            let expected = candidates
                .iter()
                .map(|sig| format!("`{sig}`"))
                .collect::<Vec<_>>()
                .join(", ");
            let found = args
                .iter()
                .map(|arg| arg.value_type().map_or_else(|| "_".to_string(), Type::to_string))
                .collect::<Vec<_>>()
                .join(", ");
            format!("expected one of {expected}, found `{method}({found})`")
        };

        Err(CodegenError::NoMatchingSignature {
            method: method.to_string(),
            detail,
        })
    }
}

fn write_types<T: fmt::Display>(
    w: &mut impl Write,
    types: impl Iterator<Item = T>,
) -> fmt::Result {
    for (i, ty) in types.enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        write!(w, "{ty}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use cadenza_ir::{NodeBuilder, OpKind};

    use super::*;
    use crate::CodegenConfig;

    fn typed_literal(value: u64, ty: Type) -> IrNode {
        NodeBuilder::new(OpKind::literal(value))
            .ty(ty)
            .build()
            .unwrap()
    }

    fn table() -> SignatureTable {
        let mut sigs = SignatureTable::new();
        sigs.insert(CallSignature::new("foo", 1, vec![Type::int128()]));
        sigs.insert(CallSignature::new("foo", 2, vec![Type::bytes(10)]));
        sigs.insert(CallSignature::new("bar", 3, vec![]));
        sigs
    }

    #[test]
    fn picks_matching_overload() {
        let sigs = table();
        let config = CodegenConfig::default();
        let ctx = FuncContext::new(&sigs, &config, false);

        let args = [typed_literal(1, Type::bytes(10))];
        let sig = TableResolver
            .lookup(&sigs, "foo", &args, None, &ctx)
            .unwrap();
        assert_eq!(sig.method_id, 2);

        let sig = TableResolver.lookup(&sigs, "bar", &[], None, &ctx).unwrap();
        assert_eq!(sig.method_id, 3);
    }

    #[test]
    fn reports_mismatch() {
        let sigs = table();
        let config = CodegenConfig::default();
        let ctx = FuncContext::new(&sigs, &config, false);

        let args = [typed_literal(1, Type::uint256()), IrNode::literal(2u64)];
        let err = TableResolver
            .lookup(&sigs, "foo", &args, None, &ctx)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no matching signature for `foo`: expected one of `foo(int128)`, \
             `foo(bytes[10])`, found `foo(uint256, _)`"
        );

        let err = TableResolver
            .lookup(&sigs, "baz", &[], None, &ctx)
            .unwrap_err();
        assert_eq!(
            err,
            CodegenError::NoMatchingSignature {
                method: "baz".to_string(),
                detail: "function is not declared".to_string(),
            }
        );
    }

    #[test]
    fn table_keeps_declaration_order() {
        let sigs = table();
        let names: Vec<_> = sigs.iter().map(|sig| sig.method_id).collect();
        assert_eq!(names, [1, 2, 3]);
        assert!(sigs.overloads("missing").is_empty());
    }
}
