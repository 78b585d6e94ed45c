//! Registry for user-defined types (structs and enums).
//!
//! The registry is owned by a single compilation unit. Struct fields are
//! kept in declaration order because field references compute addresses
//! by declaration index.

use rustc_hash::FxHashMap;

use crate::{PrimitiveKind, Type};

/// One struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        FieldDef {
            name: name.into(),
            ty,
        }
    }
}

/// A struct definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructDef {
    pub name: String,
    /// Fields in declaration order; `None` while the struct is only declared.
    pub fields: Option<Vec<FieldDef>>,
    /// Generic parameters that have not been instantiated.
    pub type_params: Vec<String>,
}

impl StructDef {
    /// True once the struct has a body.
    pub fn is_complete(&self) -> bool {
        self.fields.is_some()
    }

    /// True if the struct still has uninstantiated parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Find a field by name, returning its declaration index.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDef)> {
        self.fields
            .as_deref()?
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }
}

/// An enum definition.
///
/// Values of an enum are represented as a struct with one field of the
/// underlying integer type holding the member's value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDef {
    pub name: String,
    pub underlying: PrimitiveKind,
    /// Members in declaration order with their values.
    pub members: Vec<(String, i128)>,
}

impl EnumDef {
    /// Value of a member by name.
    pub fn member(&self, name: &str) -> Option<i128> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| *value)
    }

    /// Type of the representation's single field.
    pub fn underlying_type(&self) -> Type {
        Type::Primitive(self.underlying)
    }
}

/// Errors when registering definitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("type `{0}` is already defined")]
    Duplicate(String),
    #[error("enum `{name}` needs an integer underlying type, found `{found}`")]
    NonIntegerEnum { name: String, found: Type },
}

/// Struct and enum definitions of one unit, looked up by name.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    structs: FxHashMap<String, StructDef>,
    enums: FxHashMap<String, EnumDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a struct without a body. Re-declaring is allowed.
    pub fn declare_struct(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.structs.entry(name.clone()).or_insert(StructDef {
            name,
            fields: None,
            type_params: Vec::new(),
        });
    }

    /// Define a struct with its fields in declaration order.
    ///
    /// Completes an earlier declaration; a second body is an error.
    pub fn define_struct(
        &mut self,
        name: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Result<(), RegistryError> {
        self.define_generic_struct(name, Vec::new(), fields)
    }

    /// Define a struct that still has generic parameters.
    pub fn define_generic_struct(
        &mut self,
        name: impl Into<String>,
        type_params: Vec<String>,
        fields: Vec<FieldDef>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.enums.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        match self.structs.get_mut(&name) {
            Some(existing) if existing.is_complete() => Err(RegistryError::Duplicate(name)),
            Some(existing) => {
                existing.fields = Some(fields);
                existing.type_params = type_params;
                Ok(())
            }
            None => {
                self.structs.insert(
                    name.clone(),
                    StructDef {
                        name,
                        fields: Some(fields),
                        type_params,
                    },
                );
                Ok(())
            }
        }
    }

    /// Define an enum.
    pub fn define_enum(
        &mut self,
        name: impl Into<String>,
        underlying: PrimitiveKind,
        members: Vec<(String, i128)>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if !underlying.is_integer() {
            return Err(RegistryError::NonIntegerEnum {
                name,
                found: Type::Primitive(underlying),
            });
        }
        if self.enums.contains_key(&name) || self.structs.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.enums.insert(
            name.clone(),
            EnumDef {
                name,
                underlying,
                members,
            },
        );
        Ok(())
    }

    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Resolve a bare type name to a struct or enum type.
    pub fn lookup_named(&self, name: &str) -> Option<Type> {
        if self.enums.contains_key(name) {
            Some(Type::Enum(name.to_owned()))
        } else if self.structs.contains_key(name) {
            Some(Type::Struct(name.to_owned()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_field_lookup_uses_declaration_order() {
        let mut types = TypeRegistry::new();
        types
            .define_struct(
                "point",
                vec![FieldDef::new("x", Type::INT), FieldDef::new("y", Type::INT)],
            )
            .unwrap();

        let def = types.struct_def("point").unwrap();
        assert_eq!(def.field("y").map(|(idx, _)| idx), Some(1));
        assert!(def.field("z").is_none());
    }

    #[test]
    fn test_declare_then_define() {
        let mut types = TypeRegistry::new();
        types.declare_struct("node");
        assert!(!types.struct_def("node").unwrap().is_complete());

        types
            .define_struct(
                "node",
                vec![FieldDef::new("next", Type::pointer_to(Type::struct_named("node")))],
            )
            .unwrap();
        assert!(types.struct_def("node").unwrap().is_complete());
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut types = TypeRegistry::new();
        types.define_struct("s", Vec::new()).unwrap();
        assert_eq!(
            types.define_struct("s", Vec::new()),
            Err(RegistryError::Duplicate("s".to_owned()))
        );
        assert_eq!(
            types.define_enum("s", PrimitiveKind::Int, Vec::new()),
            Err(RegistryError::Duplicate("s".to_owned()))
        );
    }

    #[test]
    fn test_enum_members() {
        let mut types = TypeRegistry::new();
        types
            .define_enum(
                "color",
                PrimitiveKind::UInt8,
                vec![("red".to_owned(), 0), ("green".to_owned(), 1)],
            )
            .unwrap();

        let def = types.enum_def("color").unwrap();
        assert_eq!(def.member("green"), Some(1));
        assert_eq!(def.member("blue"), None);
        assert_eq!(types.lookup_named("color"), Some(Type::enum_named("color")));
    }

    #[test]
    fn test_enum_underlying_must_be_integer() {
        let mut types = TypeRegistry::new();
        assert!(matches!(
            types.define_enum("e", PrimitiveKind::Double, Vec::new()),
            Err(RegistryError::NonIntegerEnum { .. })
        ));
    }
}
