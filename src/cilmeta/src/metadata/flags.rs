use bitflags::bitflags;

bitflags! {
    /// # II.23.1.15 Flags for types [TypeAttributes]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeAttributes: u32 {
        /// Use this mask to retrieve visibility information.
        const VISIBILITY_MASK = 0x0000_0007;
        /// Class has no public scope.
        const NOT_PUBLIC = 0x0000_0000;
        /// Class has public scope.
        const PUBLIC = 0x0000_0001;
        /// Class is nested with public visibility.
        const NESTED_PUBLIC = 0x0000_0002;
        /// Class is nested with private visibility.
        const NESTED_PRIVATE = 0x0000_0003;
        /// Class is nested with family visibility.
        const NESTED_FAMILY = 0x0000_0004;
        /// Class is nested with assembly visibility.
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Class is nested with family and assembly visibility.
        const NESTED_FAM_AND_ASSEM = 0x0000_0006;
        /// Class is nested with family or assembly visibility.
        const NESTED_FAM_OR_ASSEM = 0x0000_0007;

        /// Use this mask to retrieve class layout information.
        const LAYOUT_MASK = 0x0000_0018;
        /// Class fields are laid out sequentially.
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Layout is supplied explicitly.
        const EXPLICIT_LAYOUT = 0x0000_0010;

        /// Type is an interface.
        const INTERFACE = 0x0000_0020;
        /// Class is abstract.
        const ABSTRACT = 0x0000_0080;
        /// Class cannot be extended.
        const SEALED = 0x0000_0100;
        /// Class name is special.
        const SPECIAL_NAME = 0x0000_0400;

        /// Class/Interface is imported.
        const IMPORT = 0x0000_1000;
        /// Reserved (class is serializable).
        const SERIALIZABLE = 0x0000_2000;

        /// Use this mask to retrieve string information for native interop.
        const STRING_FORMAT_MASK = 0x0003_0000;
        /// LPSTR is interpreted as Unicode.
        const UNICODE_CLASS = 0x0001_0000;
        /// LPSTR is interpreted automatically.
        const AUTO_CLASS = 0x0002_0000;
        /// A non-standard encoding specified by `CUSTOM_STRING_FORMAT_MASK`.
        const CUSTOM_FORMAT_CLASS = 0x0003_0000;
        /// Use this mask to retrieve non-standard encoding information for native interop.
        const CUSTOM_STRING_FORMAT_MASK = 0x00C0_0000;

        /// Initialize the class before first static field access.
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// CLI provides 'special' behavior, depending upon the name of the Type.
        const RT_SPECIAL_NAME = 0x0000_0800;
        /// Type has security associated with it.
        const HAS_SECURITY = 0x0004_0000;
        /// This ExportedType entry is a type forwarder.
        const IS_TYPE_FORWARDER = 0x0020_0000;
    }

    /// # II.23.1.5 Flags for fields [FieldAttributes]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldAttributes: u16 {
        /// These 3 bits contain one of the accessibility values.
        const FIELD_ACCESS_MASK = 0x0007;
        /// Accessible only by the parent type.
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly.
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the Assembly.
        const ASSEMBLY = 0x0003;
        /// Accessible only by type and sub-types.
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in assembly.
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope field.
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance.
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init.
        const INIT_ONLY = 0x0020;
        /// Value is compile time constant.
        const LITERAL = 0x0040;
        /// Reserved (this field should not be serialized when type is remoted).
        const NOT_SERIALIZED = 0x0080;
        /// Field is special.
        const SPECIAL_NAME = 0x0200;
        /// Implementation is forwarded through PInvoke.
        const PINVOKE_IMPL = 0x2000;
        /// CLI provides 'special' behavior, depending upon the name of the field.
        const RT_SPECIAL_NAME = 0x0400;
        /// Field has marshalling information.
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Field has default.
        const HAS_DEFAULT = 0x8000;
        /// Field has RVA.
        const HAS_FIELD_RVA = 0x0100;
    }

    /// # II.23.1.10 Flags for methods [MethodAttributes]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodAttributes: u16 {
        /// These 3 bits contain one of the accessibility values.
        const MEMBER_ACCESS_MASK = 0x0007;
        /// Accessible only by the parent type.
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly.
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the Assembly.
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types.
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in assembly.
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope.
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance.
        const STATIC = 0x0010;
        /// Method cannot be overridden.
        const FINAL = 0x0020;
        /// Method is virtual.
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name.
        const HIDE_BY_SIG = 0x0080;
        /// Use this mask to retrieve vtable attributes.
        const VTABLE_LAYOUT_MASK = 0x0100;
        /// Method always gets a new slot in the vtable.
        const NEW_SLOT = 0x0100;
        /// Method can only be overridden if also accessible.
        const STRICT = 0x0200;
        /// Method does not provide an implementation.
        const ABSTRACT = 0x0400;
        /// Method is special.
        const SPECIAL_NAME = 0x0800;
        /// Implementation is forwarded through PInvoke.
        const PINVOKE_IMPL = 0x2000;
        /// Reserved: shall be zero for conforming implementations.
        const UNMANAGED_EXPORT = 0x0008;
        /// CLI provides 'special' behavior, depending upon the name of the method.
        const RT_SPECIAL_NAME = 0x1000;
        /// Method has security associated with it.
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code.
        const REQUIRE_SEC_OBJECT = 0x8000;
    }

    /// # II.23.1.11 Flags for methods [MethodImplAttributes]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodImplAttributes: u16 {
        /// These 2 bits contain one of the code type values.
        const CODE_TYPE_MASK = 0x0003;
        /// Method implementation is CIL.
        const IL = 0x0000;
        /// Method implementation is native.
        const NATIVE = 0x0001;
        /// Reserved: shall be zero in conforming implementations.
        const OPTIL = 0x0002;
        /// Method implementation is provided by the runtime.
        const RUNTIME = 0x0003;
        /// Method implementation is unmanaged.
        const UNMANAGED = 0x0004;
        /// Method cannot be inlined.
        const NO_INLINING = 0x0008;
        /// Indicates the method is defined; used primarily in merge scenarios.
        const FORWARD_REF = 0x0010;
        /// Method is single threaded through the body.
        const SYNCHRONIZED = 0x0020;
        /// Reserved: conforming implementations can ignore.
        const PRESERVE_SIG = 0x0080;
        /// Reserved: shall be zero in conforming implementations.
        const INTERNAL_CALL = 0x1000;
        /// Method will not be optimized when generating native code.
        const NO_OPTIMIZATION = 0x0040;
    }

    /// # II.23.1.13 Flags for params [ParamAttributes]
    ///
    /// | Flag              | Value    | Description |
    /// | ----------------- | -------- | ----------- |
    /// | `In`              | `0x0001` | Param is \[In\] |
    /// | `Out`             | `0x0002` | Param is \[out\] |
    /// | `Optional`        | `0x0010` | Param is optional |
    /// | `HasDefault`      | `0x1000` | Param has default value |
    /// | `HasFieldMarshal` | `0x2000` | Param has FieldMarshal |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParamAttributes: u16 {
        const IN = 0x0001;
        const OUT = 0x0002;
        const OPTIONAL = 0x0010;
        const HAS_DEFAULT = 0x1000;
        const HAS_FIELD_MARSHAL = 0x2000;
    }

    /// # II.23.1.4 Flags for events [EventAttributes]
    ///
    /// | Flag            | Value    | Description |
    /// | --------------- | -------- | ----------- |
    /// | `SpecialName`   | `0x0200` | Event is special. |
    /// | `RTSpecialName` | `0x0400` | CLI provides 'special' behavior, depending upon the name of the event |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventAttributes: u16 {
        const SPECIAL_NAME = 0x0200;
        const RT_SPECIAL_NAME = 0x0400;
    }

    /// # II.23.1.14 Flags for properties [PropertyAttributes]
    ///
    /// | Flag            | Value    | Description |
    /// | --------------- | -------- | ----------- |
    /// | `SpecialName`   | `0x0200` | Property is special. |
    /// | `RTSpecialName` | `0x0400` | Runtime(metadata internal APIs) should check name encoding. |
    /// | `HasDefault`    | `0x1000` | Property has default. |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyAttributes: u16 {
        const SPECIAL_NAME = 0x0200;
        const RT_SPECIAL_NAME = 0x0400;
        const HAS_DEFAULT = 0x1000;
    }

    /// # II.23.1.12 Flags for MethodSemantics [MethodSemanticsAttributes]
    ///
    /// | Flag       | Value    | Description |
    /// | ---------- | -------- | ----------- |
    /// | `Setter`   | `0x0001` | Setter for property |
    /// | `Getter`   | `0x0002` | Getter for property |
    /// | `Other`    | `0x0004` | Other method for property or event |
    /// | `AddOn`    | `0x0008` | AddOn method for event |
    /// | `RemoveOn` | `0x0010` | RemoveOn method for event |
    /// | `Fire`     | `0x0020` | Fire method for event |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodSemanticsAttributes: u16 {
        const SETTER = 0x0001;
        const GETTER = 0x0002;
        const OTHER = 0x0004;
        const ADD_ON = 0x0008;
        const REMOVE_ON = 0x0010;
        const FIRE = 0x0020;
    }

    /// # II.23.1.8 Flags for ImplMap [PInvokeAttributes]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PInvokeAttributes: u16 {
        /// PInvoke is to use the member name as specified.
        const NO_MANGLE = 0x0001;
        /// Use this mask to retrieve the CharSet information.
        const CHAR_SET_MASK = 0x0006;
        const CHAR_SET_ANSI = 0x0002;
        const CHAR_SET_UNICODE = 0x0004;
        const CHAR_SET_AUTO = 0x0006;
        /// Information about target function. Not relevant for fields.
        const SUPPORTS_LAST_ERROR = 0x0040;
        /// Use this mask to retrieve the calling convention information.
        const CALL_CONV_MASK = 0x0700;
        const CALL_CONV_PLATFORMAPI = 0x0100;
        const CALL_CONV_CDECL = 0x0200;
        const CALL_CONV_STDCALL = 0x0300;
        const CALL_CONV_THISCALL = 0x0400;
        const CALL_CONV_FASTCALL = 0x0500;
    }

    /// # II.23.1.2 Values for AssemblyFlags
    ///
    /// | Flag                         | Value    | Description |
    /// | ---------------------------- | -------- | ----------- |
    /// | `PublicKey`                  | `0x0001` | The assembly reference holds the full (unhashed) public key. |
    /// | `Retargetable`               | `0x0100` | The implementation of this assembly used at runtime is not expected to match the version seen at compile time. |
    /// | `DisableJITcompileOptimizer` | `0x4000` | Reserved. |
    /// | `EnableJITcompileTracking`   | `0x8000` | Reserved. |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AssemblyFlags: u32 {
        const PUBLIC_KEY = 0x0001;
        const RETARGETABLE = 0x0100;
        const DISABLE_JIT_COMPILE_OPTIMIZER = 0x4000;
        const ENABLE_JIT_COMPILE_TRACKING = 0x8000;
    }

    /// # II.23.1.6 Flags for files [FileAttributes]
    ///
    /// | Flag                 | Value    | Description  |
    /// | -------------------- | -------- | ------------ |
    /// | `ContainsMetaData`   | `0x0000` | This is not a resource file |
    /// | `ContainsNoMetaData` | `0x0001` | This is a resource file or other non-metadata-containing file |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileAttributes: u32 {
        const CONTAINS_NO_META_DATA = 0x0001;
    }

    /// # II.23.1.9 Flags for ManifestResource [ManifestResourceAttributes]
    ///
    /// | Flag             | Value    | Description |
    /// | ---------------- | -------- | ----------- |
    /// | `VisibilityMask` | `0x0007` | These 3 bits contain one of the following values: |
    /// | - `Public`       | `0x0001` | The Resource is exported from the Assembly |
    /// | - `Private`      | `0x0002` | The Resource is private to the Assembly |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ManifestResourceAttributes: u32 {
        const VISIBILITY_MASK = 0x0007;
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
    }

    /// # II.23.1.7 Flags for Generic Parameters [GenericParamAttributes]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GenericParamAttributes: u16 {
        /// These 2 bits contain one of the variance values.
        const VARIANCE_MASK = 0x0003;
        /// The generic parameter is covariant.
        const COVARIANT = 0x0001;
        /// The generic parameter is contravariant.
        const CONTRAVARIANT = 0x0002;
        /// These 3 bits contain one of the special-constraint values.
        const SPECIAL_CONSTRAINT_MASK = 0x001C;
        /// The generic parameter has the class special constraint.
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// The generic parameter has the valuetype special constraint.
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// The generic parameter has the .ctor special constraint.
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

impl ManifestResourceAttributes {
    pub fn is_public(&self) -> bool {
        self.bits() & Self::VISIBILITY_MASK.bits() == Self::PUBLIC.bits()
    }

    pub fn is_private(&self) -> bool {
        self.bits() & Self::VISIBILITY_MASK.bits() == Self::PRIVATE.bits()
    }
}

/// # II.23.1.1 Values for AssemblyHashAlgorithm
///
/// | Algorithm     | Value    |
/// | ------------- | -------- |
/// | `None`        | `0x0000` |
/// | Reserved (MD5)| `0x8003` |
/// | `SHA1`        | `0x8004` |
///
/// Unknown values are preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssemblyHashAlgorithm(pub u32);

impl AssemblyHashAlgorithm {
    pub const NONE: u32 = 0x0000;
    pub const MD5: u32 = 0x8003;
    pub const SHA1: u32 = 0x8004;

    pub fn name(&self) -> Option<&'static str> {
        match self.0 {
            Self::NONE => Some("None"),
            Self::MD5 => Some("MD5"),
            Self::SHA1 => Some("SHA1"),
            _ => None,
        }
    }
}

impl From<u32> for AssemblyHashAlgorithm {
    fn from(value: u32) -> Self {
        AssemblyHashAlgorithm(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bits_are_retained() {
        let flags = TypeAttributes::from_bits_retain(0xFFFF_FFFF);
        assert_eq!(flags.bits(), 0xFFFF_FFFF);
        assert!(flags.contains(TypeAttributes::SEALED));
    }

    #[test]
    fn resource_visibility() {
        let public = ManifestResourceAttributes::from_bits_retain(0x0001);
        assert!(public.is_public());
        assert!(!public.is_private());
        let private = ManifestResourceAttributes::from_bits_retain(0x0002);
        assert!(private.is_private());
    }

    #[test]
    fn hash_algorithm_names() {
        assert_eq!(AssemblyHashAlgorithm(0x8004).name(), Some("SHA1"));
        assert_eq!(AssemblyHashAlgorithm(0x1234).name(), None);
    }
}
