//! Type descriptors and the type compatibility engine
//!
//! A [`CType`] describes a C type the checker can reason about: a base type,
//! a pointer depth, an array flag, and the typedef names it was reached
//! through. [`TypeDesc`] wraps it with two sentinels:
//!
//! - [`TypeDesc::Unknown`]: nothing can be inferred (undeclared names,
//!   unsupported constructs). Never flagged and never propagated as an error.
//! - [`TypeDesc::Invalid`]: the result of an illegal operation that has
//!   already been reported.
//!
//! # Rules
//!
//! [`is_compatible`] decides assignment and initialization:
//! numeric widening (`char -> int -> float/double`) is accepted, narrowing
//! (`double -> int`, `int -> char`) is rejected, pointers match on base type
//! or through `void*`, the literal `0` converts to any pointer, and structs
//! match by tag.
//!
//! [`result_type`] decides binary operators. Arithmetic promotes toward the
//! wider of `int < float < double`, comparisons need compatible operands,
//! logical operators always yield `int`, and bitwise/shift operators need
//! numeric operands.
//!
//! Both functions are total over every pair of descriptors.

use std::fmt;

/// Base types supported by the checker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Float,
    Double,
    Char,
    Void,
    Struct(String), // Struct tag
}

impl BaseType {
    /// Numeric rank used for promotion: char < int < float < double.
    fn rank(&self) -> Option<u8> {
        match self {
            BaseType::Char => Some(0),
            BaseType::Int => Some(1),
            BaseType::Float => Some(2),
            BaseType::Double => Some(3),
            BaseType::Void | BaseType::Struct(_) => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Float => write!(f, "float"),
            BaseType::Double => write!(f, "double"),
            BaseType::Char => write!(f, "char"),
            BaseType::Void => write!(f, "void"),
            BaseType::Struct(tag) => write!(f, "struct {}", tag),
        }
    }
}

/// Type representation with pointers, arrays, const, and typedef aliases.
///
/// Equality compares the shape only (base, pointer depth, array flag);
/// qualifiers, aliases, and the null-constant marker are ignored.
#[derive(Debug, Clone, Eq)]
pub struct CType {
    pub base: BaseType,
    pub pointer_depth: usize, // 0 = not pointer, 1 = *, 2 = **, etc.
    pub is_array: bool,
    /// The object itself is const (`const int x`, `int *const p`)
    pub is_const: bool,
    /// Typedef names this type was spelled through, outermost last
    pub aliases: Vec<String>,
    /// Set only for the integer literal `0`
    pub null_constant: bool,
}

impl PartialEq for CType {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.pointer_depth == other.pointer_depth
            && self.is_array == other.is_array
    }
}

impl CType {
    pub fn new(base: BaseType) -> Self {
        CType {
            base,
            pointer_depth: 0,
            is_array: false,
            is_const: false,
            aliases: Vec::new(),
            null_constant: false,
        }
    }

    pub fn int() -> Self {
        Self::new(BaseType::Int)
    }

    pub fn float() -> Self {
        Self::new(BaseType::Float)
    }

    pub fn double() -> Self {
        Self::new(BaseType::Double)
    }

    pub fn char() -> Self {
        Self::new(BaseType::Char)
    }

    pub fn void() -> Self {
        Self::new(BaseType::Void)
    }

    pub fn structure(tag: impl Into<String>) -> Self {
        Self::new(BaseType::Struct(tag.into()))
    }

    /// The type of a string literal: `char*`
    pub fn string() -> Self {
        Self::char().with_pointer()
    }

    /// The type of the literal `0`: an `int` that also converts to any pointer
    pub fn null_literal() -> Self {
        let mut ty = Self::int();
        ty.null_constant = true;
        ty
    }

    /// Pointer to this type. Typedef names no longer describe the result.
    pub fn with_pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self.null_constant = false;
        self.is_const = false;
        self.aliases.clear();
        self
    }

    pub fn with_array(mut self) -> Self {
        self.is_array = true;
        self.aliases.clear();
        self
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Array-to-pointer decay; non-arrays are returned unchanged.
    pub fn decayed(&self) -> CType {
        if self.is_array {
            let mut ty = self.clone();
            ty.is_array = false;
            ty.pointer_depth += 1;
            ty.aliases.clear();
            ty
        } else {
            self.clone()
        }
    }

    /// Element type of an array or pointee type of a pointer.
    pub fn element(&self) -> Option<CType> {
        if self.is_array {
            let mut ty = self.clone();
            ty.is_array = false;
            ty.aliases.clear();
            Some(ty)
        } else if self.pointer_depth > 0 {
            let mut ty = self.clone();
            ty.pointer_depth -= 1;
            ty.aliases.clear();
            ty.is_const = false;
            Some(ty)
        } else {
            None
        }
    }

    /// Strip qualifiers and markers that only apply to a particular value.
    pub fn value_type(&self) -> CType {
        let mut ty = self.clone();
        ty.is_const = false;
        ty.null_constant = false;
        ty
    }

    pub fn is_scalar_base(&self) -> bool {
        self.pointer_depth == 0 && !self.is_array
    }

    pub fn is_numeric(&self) -> bool {
        self.is_scalar_base() && self.base.rank().is_some()
    }

    pub fn is_integer(&self) -> bool {
        self.is_scalar_base() && matches!(self.base, BaseType::Int | BaseType::Char)
    }

    pub fn is_floating(&self) -> bool {
        self.is_scalar_base() && matches!(self.base, BaseType::Float | BaseType::Double)
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0 && !self.is_array
    }

    /// `char*` or `char[]`
    pub fn is_string_like(&self) -> bool {
        self.base == BaseType::Char
            && ((self.pointer_depth == 1 && !self.is_array)
                || (self.pointer_depth == 0 && self.is_array))
    }

    /// Plain `void` (not `void*`)
    pub fn is_void_value(&self) -> bool {
        self.base == BaseType::Void && self.is_scalar_base()
    }

    /// A struct by value (not a pointer to one)
    pub fn is_struct_value(&self) -> bool {
        matches!(self.base, BaseType::Struct(_)) && self.is_scalar_base()
    }

    pub fn struct_tag(&self) -> Option<&str> {
        match &self.base {
            BaseType::Struct(tag) => Some(tag),
            _ => None,
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = self.aliases.last() {
            return write!(f, "{}", alias);
        }
        write!(f, "{}", self.base)?;
        for _ in 0..self.pointer_depth {
            write!(f, "*")?;
        }
        if self.is_array {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A resolved type, or one of the two sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    /// Not inferable; never flagged
    Unknown,
    /// Result of an operation already reported as illegal
    Invalid,
    Known(CType),
}

impl TypeDesc {
    pub fn known(&self) -> Option<&CType> {
        match self {
            TypeDesc::Known(ty) => Some(ty),
            TypeDesc::Unknown | TypeDesc::Invalid => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDesc::Unknown)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, TypeDesc::Invalid)
    }
}

impl From<CType> for TypeDesc {
    fn from(ty: CType) -> Self {
        TypeDesc::Known(ty)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Unknown => write!(f, "<unknown>"),
            TypeDesc::Invalid => write!(f, "<invalid>"),
            TypeDesc::Known(ty) => write!(f, "{}", ty),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// Operator families with a shared typing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Arithmetic,
    Comparison,
    Logical,
    Bitwise,
}

impl BinOp {
    pub fn class(self) -> OpClass {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => OpClass::Arithmetic,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                OpClass::Comparison
            }
            BinOp::And | BinOp::Or => OpClass::Logical,
            BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => {
                OpClass::Bitwise
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Can a value of type `source` be assigned to (or initialize) `target`?
///
/// Sentinels on either side are accepted: `Unknown` means "don't flag" and
/// `Invalid` has already been reported where it was produced.
pub fn is_compatible(target: &TypeDesc, source: &TypeDesc) -> bool {
    match (target, source) {
        (TypeDesc::Known(target), TypeDesc::Known(source)) => compatible(target, source),
        _ => true,
    }
}

/// Compatibility over resolved types.
pub fn compatible(target: &CType, source: &CType) -> bool {
    if target == source {
        return true;
    }
    if target.is_void_value() || source.is_void_value() {
        return false;
    }

    // Arrays are only initialized from string literals; everything else
    // goes element by element through an initializer list.
    if target.is_array {
        return target.base == BaseType::Char
            && target.pointer_depth == 0
            && source.is_string_like();
    }

    let source = source.decayed();
    if target.pointer_depth > 0 {
        if source.null_constant {
            return true;
        }
        if source.pointer_depth == 0 {
            return false;
        }
        // String-like pairs land here too: `char*` only matches `char*`.
        return (target.base == source.base && target.pointer_depth == source.pointer_depth)
            || target.base == BaseType::Void
            || source.base == BaseType::Void;
    }
    if source.pointer_depth > 0 {
        return false;
    }

    match (&target.base, &source.base) {
        (BaseType::Struct(a), BaseType::Struct(b)) => a == b,
        (BaseType::Struct(_), _) | (_, BaseType::Struct(_)) => false,
        (BaseType::Char, BaseType::Char) => true,
        // narrowing into char
        (BaseType::Char, _) => false,
        (BaseType::Int, BaseType::Int | BaseType::Char) => true,
        // narrowing from floating point
        (BaseType::Int, BaseType::Float | BaseType::Double) => false,
        (BaseType::Float | BaseType::Double, _) => source.is_numeric(),
        _ => false,
    }
}

/// Result type of `lhs op rhs`.
///
/// Returns `Invalid` for an illegal combination and `Unknown` when either
/// operand is a sentinel or the combination is not modelled.
pub fn result_type(lhs: &TypeDesc, rhs: &TypeDesc, op: BinOp) -> TypeDesc {
    let (lhs, rhs) = match (lhs, rhs) {
        (TypeDesc::Known(l), TypeDesc::Known(r)) => (l.decayed(), r.decayed()),
        _ => return TypeDesc::Unknown,
    };

    match op.class() {
        OpClass::Logical => CType::int().into(),
        OpClass::Comparison => {
            if compatible(&lhs, &rhs) || compatible(&rhs, &lhs) {
                CType::int().into()
            } else {
                TypeDesc::Invalid
            }
        }
        OpClass::Bitwise => {
            if lhs.is_numeric() && rhs.is_numeric() {
                CType::int().into()
            } else {
                TypeDesc::Invalid
            }
        }
        OpClass::Arithmetic => arithmetic_result(&lhs, &rhs, op),
    }
}

fn arithmetic_result(lhs: &CType, rhs: &CType, op: BinOp) -> TypeDesc {
    if op == BinOp::Add && (lhs.is_string_like() || rhs.is_string_like()) {
        return CType::string().into();
    }

    if lhs.is_numeric() && rhs.is_numeric() {
        if op == BinOp::Mod && (lhs.is_floating() || rhs.is_floating()) {
            return TypeDesc::Invalid;
        }
        return promote(lhs, rhs).into();
    }

    match op {
        BinOp::Add | BinOp::Sub if lhs.is_pointer() && rhs.is_integer() => {
            return lhs.value_type().into();
        }
        BinOp::Add if lhs.is_integer() && rhs.is_pointer() => {
            return rhs.value_type().into();
        }
        BinOp::Sub if lhs.is_pointer() && lhs == rhs => return CType::int().into(),
        _ => {}
    }

    let illegal = |ty: &CType| ty.is_struct_value() || ty.is_void_value() || ty.is_pointer();
    if illegal(lhs) || illegal(rhs) {
        TypeDesc::Invalid
    } else {
        TypeDesc::Unknown
    }
}

/// Usual arithmetic promotion, never narrower than `int`.
fn promote(lhs: &CType, rhs: &CType) -> CType {
    let rank = |ty: &CType| ty.base.rank().unwrap_or(1).max(1);
    match rank(lhs).max(rank(rhs)) {
        3 => CType::double(),
        2 => CType::float(),
        _ => CType::int(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(ty: CType) -> TypeDesc {
        TypeDesc::Known(ty)
    }

    #[test]
    fn test_widening_and_narrowing() {
        assert!(compatible(&CType::double(), &CType::int()));
        assert!(compatible(&CType::float(), &CType::char()));
        assert!(compatible(&CType::int(), &CType::char()));
        assert!(compatible(&CType::double(), &CType::float()));

        assert!(!compatible(&CType::int(), &CType::double()));
        assert!(!compatible(&CType::int(), &CType::float()));
        assert!(!compatible(&CType::char(), &CType::int()));
    }

    #[test]
    fn test_void_never_compatible() {
        assert!(!compatible(&CType::int(), &CType::void()));
        assert!(!compatible(&CType::void(), &CType::int()));
        // `void == void` still counts as an exact match
        assert!(compatible(&CType::void(), &CType::void()));
    }

    #[test]
    fn test_pointer_rules() {
        let int_ptr = CType::int().with_pointer();
        let char_ptr = CType::char().with_pointer();
        let void_ptr = CType::void().with_pointer();

        assert!(compatible(&int_ptr, &CType::null_literal()));
        assert!(!compatible(&int_ptr, &CType::int()));
        assert!(compatible(&int_ptr, &void_ptr));
        assert!(compatible(&void_ptr, &char_ptr));
        assert!(!compatible(&int_ptr, &char_ptr));
        assert!(!compatible(&int_ptr, &CType::int().with_pointer().with_pointer()));
        assert!(!compatible(&CType::int(), &int_ptr));
    }

    #[test]
    fn test_array_decay_and_string_init() {
        let int_array = CType::int().with_array();
        let char_array = CType::char().with_array();

        assert!(compatible(&CType::int().with_pointer(), &int_array));
        assert!(compatible(&char_array, &CType::string()));
        assert!(!compatible(&int_array, &CType::int()));
        assert!(!compatible(&CType::int(), &CType::string()));
    }

    #[test]
    fn test_struct_by_tag() {
        assert!(compatible(&CType::structure("Point"), &CType::structure("Point")));
        assert!(!compatible(&CType::structure("Point"), &CType::structure("Size")));
        assert!(!compatible(&CType::structure("Point"), &CType::int()));
    }

    #[test]
    fn test_aliases_do_not_affect_equality() {
        let my_int = CType::int().with_alias("MyInt");
        assert_eq!(my_int, CType::int());
        assert!(compatible(&my_int, &CType::char()));
        assert_eq!(my_int.to_string(), "MyInt");
    }

    #[test]
    fn test_sentinels_are_compatible() {
        assert!(is_compatible(&TypeDesc::Unknown, &known(CType::int())));
        assert!(is_compatible(&known(CType::int()), &TypeDesc::Invalid));
    }

    #[test]
    fn test_arithmetic_promotion() {
        let int = known(CType::int());
        let char = known(CType::char());
        let float = known(CType::float());
        let double = known(CType::double());

        assert_eq!(result_type(&char, &char, BinOp::Add), int);
        assert_eq!(result_type(&int, &float, BinOp::Mul), float);
        assert_eq!(result_type(&float, &double, BinOp::Sub), double);
        assert_eq!(result_type(&double, &int, BinOp::Mod), TypeDesc::Invalid);
    }

    #[test]
    fn test_string_plus_anything() {
        let string = known(CType::string());
        let result = result_type(&known(CType::int()), &string, BinOp::Add);
        assert_eq!(result, known(CType::string()));
    }

    #[test]
    fn test_comparison_and_logical() {
        let int = known(CType::int());
        let string = known(CType::string());
        let point = known(CType::structure("Point"));

        assert_eq!(result_type(&int, &known(CType::char()), BinOp::Lt), int);
        assert_eq!(result_type(&int, &string, BinOp::Eq), TypeDesc::Invalid);
        assert_eq!(result_type(&point, &string, BinOp::And), int);
    }

    #[test]
    fn test_bitwise_requires_numeric() {
        let int = known(CType::int());
        assert_eq!(result_type(&int, &int, BinOp::Shl), int);
        assert_eq!(
            result_type(&int, &known(CType::string()), BinOp::BitAnd),
            TypeDesc::Invalid
        );
    }

    #[test]
    fn test_pointer_arithmetic() {
        let int_ptr = known(CType::int().with_pointer());
        let int = known(CType::int());
        assert_eq!(result_type(&int_ptr, &int, BinOp::Add), int_ptr);
        assert_eq!(result_type(&int_ptr, &int_ptr, BinOp::Sub), int);
        assert_eq!(result_type(&int_ptr, &int, BinOp::Mul), TypeDesc::Invalid);
    }

    #[test]
    fn test_unknown_does_not_propagate_errors() {
        let int = known(CType::int());
        assert_eq!(result_type(&TypeDesc::Unknown, &int, BinOp::Add), TypeDesc::Unknown);
        assert_eq!(result_type(&int, &TypeDesc::Invalid, BinOp::Eq), TypeDesc::Unknown);
    }
}
