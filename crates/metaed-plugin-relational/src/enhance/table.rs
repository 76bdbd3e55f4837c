use crate::{
    data::{SCHEMA_NAME, TABLES},
    model::{Column, ColumnType, DEFAULT_DECIMAL_PRECISION, DEFAULT_STRING_LENGTH, ForeignKey, Table},
};
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_plugin_unified::data::IDENTITY;
use metaed_schema::{
    data::DataSlot,
    node::{Entity, EntityDetails, EntityRef, NamespaceId, Property, PropertyBounds, Schema},
    types::{ModelType, PropertyType},
};
use metaed_utils::case::upper_first;
use tracing::debug;

const READS: &[DataSlot] = &[IDENTITY.slot(), SCHEMA_NAME.slot()];
const WRITES: &[DataSlot] = &[TABLES.slot()];

/// Deepest chain of references, inline commons and child tables followed
/// from one entity.
const MAX_DEPTH: usize = 16;

///
/// TableEnhancer
///
/// Derives the tables of every table-producing entity. Identity members
/// become the primary key, with entity references expanded into the
/// referenced identity. Inline commons and choices flatten into the owning
/// table; commons and collections get child tables keyed by their parent.
///

#[derive(Clone, Copy, Debug)]
pub struct TableEnhancer;

impl Enhancer for TableEnhancer {
    fn name(&self) -> &'static str {
        "TableEnhancer"
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        let schema = &*ctx.schema;
        let mut planned: Vec<(EntityRef, Vec<Table>)> = Vec::new();

        for (r, entity) in schema.entities() {
            if produces_table(entity.model_type) {
                planned.push((r, TablePlanner::new(schema).plan(r, entity)?));
            }
        }

        debug!(
            entities = planned.len(),
            tables = planned.iter().map(|(_, t)| t.len()).sum::<usize>(),
            "derived tables"
        );

        for (r, tables) in planned {
            if let Some(entity) = ctx.schema.entity_mut(r) {
                entity.data.insert(TABLES, tables);
            }
        }

        Ok(())
    }
}

const fn produces_table(model_type: ModelType) -> bool {
    matches!(
        model_type,
        ModelType::Association
            | ModelType::AssociationExtension
            | ModelType::AssociationSubclass
            | ModelType::Descriptor
            | ModelType::DomainEntity
            | ModelType::DomainEntityExtension
            | ModelType::DomainEntitySubclass
    )
}

// Role name used as a column prefix, unless it repeats the property name.
fn role_prefix(property: &Property) -> &str {
    if property.role_name == property.meta_ed_name {
        ""
    } else {
        &property.role_name
    }
}

///
/// Scope
///
/// Column prefix and nullability inherited from enclosing properties.
///

#[derive(Clone, Debug, Default)]
struct Scope {
    prefix: String,
    nullable: bool,
    depth: usize,
}

impl Scope {
    fn deeper(&self, prefix: String, nullable: bool, from: &Property) -> Result<Self, EnhancerError> {
        if self.depth >= MAX_DEPTH {
            return Err(EnhancerError::Failed(format!(
                "property {} nests more than {MAX_DEPTH} levels deep",
                from.full_name()
            )));
        }

        Ok(Self {
            prefix,
            nullable,
            depth: self.depth + 1,
        })
    }

    // Flattened into the same table under the property's role name.
    fn nested(&self, property: &Property, nullable: bool) -> Result<Self, EnhancerError> {
        let prefix = format!("{}{}", self.prefix, role_prefix(property));

        self.deeper(prefix, self.nullable || nullable, property)
    }

    // Moved into a child table; prefixes restart.
    fn child(&self, property: &Property) -> Result<Self, EnhancerError> {
        self.deeper(String::new(), false, property)
    }
}

///
/// TablePlanner
///

struct TablePlanner<'a> {
    schema: &'a Schema,
    tables: Vec<Table>,
}

impl<'a> TablePlanner<'a> {
    const fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            tables: Vec::new(),
        }
    }

    // plan
    fn plan(mut self, r: EntityRef, entity: &'a Entity) -> Result<Vec<Table>, EnhancerError> {
        let schema_name = self.schema_name(r.namespace)?;
        let root = Scope::default();

        let mut main = match entity.model_type {
            ModelType::Descriptor => {
                let mut table = Table::new(schema_name, format!("{}Descriptor", entity.meta_ed_name));
                table.push_column(
                    Column::new(format!("{}DescriptorId", entity.meta_ed_name), ColumnType::Integer).key(),
                );
                table
            }
            ModelType::AssociationExtension | ModelType::DomainEntityExtension => {
                let Some(base) = entity.base_entity() else {
                    return Ok(Vec::new());
                };
                let base_name = &self.entity(base)?.meta_ed_name;
                let mut table = Table::new(schema_name, format!("{base_name}Extension"));
                let key = self.identity_columns(base, &root)?;
                self.key_referencing(&mut table, key, base)?;
                table
            }
            _ => {
                let mut table = Table::new(schema_name, entity.meta_ed_name.clone());
                match entity.base_entity().filter(|_| entity.model_type.is_subclass()) {
                    Some(base) => {
                        let key = self.identity_columns(r, &root)?;
                        self.key_referencing(&mut table, key, base)?;
                    }
                    None => self.add_identity(&mut table, r, &root)?,
                }
                table
            }
        };

        let own: Vec<&Property> = entity
            .properties
            .iter()
            .filter(|p| !p.is_part_of_identity)
            .collect();
        let at = self.tables.len();
        self.add_properties(&mut main, &own, &root)?;
        self.tables.insert(at, main);

        Ok(self.tables)
    }

    // Key columns that also reference the base entity's table.
    fn key_referencing(&self, table: &mut Table, key: Vec<Column>, base: EntityRef) -> Result<(), EnhancerError> {
        table.foreign_keys.push(self.foreign_key(&key, base)?);
        for column in key {
            table.push_column(column.key());
        }

        Ok(())
    }

    // Identity as primary key, referencing the tables of identity
    // references.
    fn add_identity(&self, table: &mut Table, r: EntityRef, scope: &Scope) -> Result<(), EnhancerError> {
        for (property, columns) in self.identity_members(r, scope)? {
            if let (Some(target), true) = (
                property.referenced_entity,
                property.property_type.is_entity_reference() && !columns.is_empty(),
            ) {
                table.foreign_keys.push(self.foreign_key(&columns, target)?);
            }
            for column in columns {
                table.push_column(column.key());
            }
        }

        Ok(())
    }

    fn add_properties(
        &mut self,
        table: &mut Table,
        properties: &[&'a Property],
        scope: &Scope,
    ) -> Result<(), EnhancerError> {
        for &property in properties {
            let nullable = scope.nullable || !property.cardinality.is_required();

            if property.cardinality.is_collection() || property.property_type == PropertyType::Common {
                self.child_table(table, property, scope)?;
                continue;
            }

            match property.property_type {
                PropertyType::Choice | PropertyType::InlineCommon => {
                    let Some(target) = property.referenced_entity else {
                        continue;
                    };
                    // choice members are alternatives, so all are optional
                    let nullable = nullable || property.property_type == PropertyType::Choice;
                    let members: Vec<&Property> = self.entity(target)?.properties.iter().collect();
                    self.add_properties(table, &members, &scope.nested(property, nullable)?)?;
                }
                PropertyType::Association | PropertyType::DomainEntity => {
                    let columns = self.value_columns(property, scope)?;
                    if let (Some(target), false) = (property.referenced_entity, columns.is_empty()) {
                        table.foreign_keys.push(self.foreign_key(&columns, target)?);
                    }
                    for column in columns {
                        table.push_column(column.nullable(nullable));
                    }
                }
                _ => {
                    for column in self.value_columns(property, scope)? {
                        let nullable = nullable || column.is_nullable;
                        table.push_column(column.nullable(nullable));
                    }
                }
            }
        }

        Ok(())
    }

    // Child table for a common or a collection, keyed by the parent key.
    fn child_table(&mut self, parent: &Table, property: &'a Property, scope: &Scope) -> Result<(), EnhancerError> {
        let scope = scope.child(property)?;
        let name = format!("{}{}", parent.name, upper_first(&property.full_name()));
        let mut child = Table::new(parent.schema.clone(), name);

        let parent_key: Vec<Column> = parent.primary_key().cloned().collect();
        let key_names: Vec<String> = parent_key.iter().map(|c| c.name.clone()).collect();
        child.foreign_keys.push(ForeignKey {
            columns: key_names.clone(),
            foreign_schema: parent.schema.clone(),
            foreign_table: parent.name.clone(),
            foreign_columns: key_names,
        });
        for column in parent_key {
            child.push_column(column);
        }

        let at = self.tables.len();
        match property.property_type {
            PropertyType::Choice | PropertyType::Common | PropertyType::InlineCommon => {
                let Some(target) = property.referenced_entity else {
                    return Ok(());
                };
                let target_entity = self.entity(target)?;
                if target_entity.data.contains(IDENTITY.slot()) {
                    self.add_identity(&mut child, target, &scope)?;
                }
                let rest: Vec<&Property> = target_entity
                    .properties
                    .iter()
                    .filter(|p| !p.is_part_of_identity)
                    .collect();
                self.add_properties(&mut child, &rest, &scope)?;
            }
            _ => {
                let columns = self.value_columns(property, &scope)?;
                if let (Some(target), true) = (
                    property.referenced_entity,
                    property.property_type.is_entity_reference(),
                ) {
                    child.foreign_keys.push(self.foreign_key(&columns, target)?);
                }
                for column in columns {
                    child.push_column(column.key());
                }
            }
        }
        self.tables.insert(at, child);

        Ok(())
    }

    // Identity members of an entity with the columns each contributes.
    fn identity_members(
        &self,
        r: EntityRef,
        scope: &Scope,
    ) -> Result<Vec<(&'a Property, Vec<Column>)>, EnhancerError> {
        let entity = self.entity(r)?;
        let identity = entity
            .data
            .get(IDENTITY)
            .ok_or_else(|| EnhancerError::MissingData {
                entity: entity.meta_ed_name.clone(),
                slot: IDENTITY.slot(),
            })?;

        let mut members = Vec::with_capacity(identity.len());
        for member in identity {
            let property = self.schema.property(member.source).ok_or_else(|| {
                EnhancerError::Failed(format!(
                    "identity member {} of {} is missing",
                    member.name, entity.meta_ed_name
                ))
            })?;
            members.push((property, self.value_columns(property, scope)?));
        }

        Ok(members)
    }

    fn identity_columns(&self, r: EntityRef, scope: &Scope) -> Result<Vec<Column>, EnhancerError> {
        Ok(self
            .identity_members(r, scope)?
            .into_iter()
            .flat_map(|(_, columns)| columns)
            .collect())
    }

    // Columns holding one value of a property.
    fn value_columns(&self, property: &Property, scope: &Scope) -> Result<Vec<Column>, EnhancerError> {
        let name = format!("{}{}", scope.prefix, property.full_name());

        let column = match property.property_type {
            PropertyType::Association | PropertyType::DomainEntity => {
                let Some(target) = property.referenced_entity else {
                    return Ok(Vec::new());
                };
                return self.identity_columns(target, &scope.nested(property, false)?);
            }
            PropertyType::Choice | PropertyType::InlineCommon => {
                let Some(target) = property.referenced_entity else {
                    return Ok(Vec::new());
                };
                let nested = scope.nested(property, false)?;
                let mut columns = Vec::new();
                for member in self
                    .entity(target)?
                    .properties
                    .iter()
                    .filter(|p| !p.cardinality.is_collection())
                {
                    let optional = !member.cardinality.is_required();
                    for column in self.value_columns(member, &nested)? {
                        let nullable = optional || column.is_nullable;
                        columns.push(column.nullable(nullable));
                    }
                }
                return Ok(columns);
            }
            PropertyType::Common => return Ok(Vec::new()),
            PropertyType::Descriptor => Column::new(format!("{name}DescriptorId"), ColumnType::Integer),
            PropertyType::Enumeration => Column::new(format!("{name}TypeId"), ColumnType::Integer),
            _ => Column::new(name, self.column_type(property)),
        };

        Ok(vec![column])
    }

    fn column_type(&self, property: &Property) -> ColumnType {
        match property.property_type {
            PropertyType::Boolean => ColumnType::Boolean,
            PropertyType::Currency => ColumnType::Currency,
            PropertyType::Date => ColumnType::Date,
            PropertyType::Datetime => ColumnType::Datetime,
            PropertyType::Decimal => decimal_type(property.bounds),
            PropertyType::Duration => ColumnType::Duration,
            PropertyType::Percent => ColumnType::Percent,
            PropertyType::SchoolYearEnumeration | PropertyType::Short | PropertyType::Year => ColumnType::Short,
            PropertyType::String => string_type(property.bounds),
            PropertyType::Time => ColumnType::Time,
            PropertyType::SharedDecimal
            | PropertyType::SharedInteger
            | PropertyType::SharedShort
            | PropertyType::SharedString => self.shared_type(property),
            _ => ColumnType::Integer,
        }
    }

    // Property bounds win over the shared type's bounds.
    fn shared_type(&self, property: &Property) -> ColumnType {
        let shared = property
            .referenced_entity
            .and_then(|r| self.schema.entity(r))
            .map(|e| &e.details);
        let bounds = match (property.bounds, shared) {
            (PropertyBounds::None, Some(EntityDetails::SharedDecimal(b))) => PropertyBounds::Decimal(*b),
            (PropertyBounds::None, Some(EntityDetails::SharedInteger { bounds, .. })) => PropertyBounds::Integer(*bounds),
            (PropertyBounds::None, Some(EntityDetails::SharedString(b))) => PropertyBounds::String(*b),
            (own, _) => own,
        };

        match property.property_type {
            PropertyType::SharedDecimal => decimal_type(bounds),
            PropertyType::SharedString => string_type(bounds),
            PropertyType::SharedShort => ColumnType::Short,
            _ => match shared {
                Some(EntityDetails::SharedInteger { is_short: true, .. }) => ColumnType::Short,
                _ => ColumnType::Integer,
            },
        }
    }

    fn foreign_key(&self, columns: &[Column], target: EntityRef) -> Result<ForeignKey, EnhancerError> {
        let foreign_columns = self
            .identity_columns(target, &Scope::default())?
            .into_iter()
            .map(|c| c.name)
            .collect();

        Ok(ForeignKey {
            columns: columns.iter().map(|c| c.name.clone()).collect(),
            foreign_schema: self.schema_name(target.namespace)?,
            foreign_table: self.entity(target)?.meta_ed_name.clone(),
            foreign_columns,
        })
    }

    fn entity(&self, r: EntityRef) -> Result<&'a Entity, EnhancerError> {
        self.schema
            .entity(r)
            .ok_or_else(|| EnhancerError::Failed(format!("entity {r} is not in the schema")))
    }

    fn schema_name(&self, id: NamespaceId) -> Result<String, EnhancerError> {
        let ns = self
            .schema
            .namespace(id)
            .ok_or_else(|| EnhancerError::Failed(format!("namespace {id} is not in the schema")))?;

        ns.data
            .get(SCHEMA_NAME)
            .cloned()
            .ok_or_else(|| EnhancerError::MissingData {
                entity: ns.namespace_name.clone(),
                slot: SCHEMA_NAME.slot(),
            })
    }
}

const fn decimal_type(bounds: PropertyBounds) -> ColumnType {
    let (precision, scale) = match bounds {
        PropertyBounds::Decimal(b) => (b.total_digits, b.decimal_places),
        _ => (None, None),
    };

    ColumnType::Decimal {
        precision: match precision {
            Some(p) => p,
            None => DEFAULT_DECIMAL_PRECISION,
        },
        scale: match scale {
            Some(s) => s,
            None => 0,
        },
    }
}

const fn string_type(bounds: PropertyBounds) -> ColumnType {
    let max_length = match bounds {
        PropertyBounds::String(b) => b.max_length,
        _ => None,
    };

    ColumnType::String {
        max_length: match max_length {
            Some(n) => n,
            None => DEFAULT_STRING_LENGTH,
        },
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::NamespaceSchemaNameEnhancer;
    use metaed_build::link::link_schema;
    use metaed_plugin_unified::enhance::IdentityPropertyEnhancer;
    use metaed_schema::prelude::*;

    fn linked(builder: SchemaBuilder) -> Schema {
        let mut schema = builder.build().unwrap();
        schema.initialize_namespaces().unwrap();
        link_schema(&mut schema);

        schema
    }

    fn run(schema: &mut Schema, enhancers: &[&dyn Enhancer]) -> Result<(), EnhancerError> {
        let mut ctx = EnhanceContext {
            schema,
            plugin: PluginId::Relational,
            target_version: SemVer::new(3, 1, 0),
        };
        for enhancer in enhancers {
            enhancer.enhance(&mut ctx)?;
        }

        Ok(())
    }

    fn tables(builder: SchemaBuilder) -> Schema {
        let mut schema = linked(builder);
        run(
            &mut schema,
            &[&IdentityPropertyEnhancer, &NamespaceSchemaNameEnhancer, &TableEnhancer],
        )
        .unwrap();

        schema
    }

    fn tables_of<'a>(schema: &'a Schema, ns: &str, ty: ModelType, name: &str) -> &'a [Table] {
        let ns = schema.namespace_by_name(ns).unwrap();
        let entity = ns.entity(ns.lookup(ty, name).unwrap()).unwrap();

        entity.data.get(TABLES).unwrap()
    }

    fn columns(table: &Table) -> Vec<(&str, bool, bool)> {
        table
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.is_primary_key, c.is_nullable))
            .collect()
    }

    fn core() -> NamespaceBuilder {
        NamespaceBuilder::core("EdFi")
            .entity(
                EntityBuilder::domain_entity("Student")
                    .property(PropertyBuilder::string("StudentUniqueId").identity())
                    .property(PropertyBuilder::inline_common("Name"))
                    .property(PropertyBuilder::common("Address").required_collection())
                    .property(PropertyBuilder::integer("Score").optional_collection()),
            )
            .entity(EntityBuilder::domain_entity("School").property(PropertyBuilder::integer("SchoolId").identity()))
            .entity(
                EntityBuilder::inline_common("Name")
                    .property(PropertyBuilder::string("FirstName"))
                    .property(PropertyBuilder::string("LastSurname").optional()),
            )
            .entity(
                EntityBuilder::common("Address")
                    .property(PropertyBuilder::string("StreetNumberName").identity())
                    .property(PropertyBuilder::string("City").string_bounds(None, Some(30))),
            )
            .entity(EntityBuilder::descriptor("GradeLevel"))
            .entity(
                EntityBuilder::association("StudentSchoolAssociation")
                    .property(PropertyBuilder::domain_entity("Student").identity())
                    .property(PropertyBuilder::domain_entity("School").role_name("Entry").identity())
                    .property(PropertyBuilder::date("EntryDate").identity())
                    .property(PropertyBuilder::date("ExitWithdrawDate").optional())
                    .property(PropertyBuilder::descriptor("GradeLevel")),
            )
    }

    #[test]
    fn references_expand_into_identity_columns() {
        let schema = tables(SchemaBuilder::new().namespace(core()));
        let tables = tables_of(&schema, "EdFi", ModelType::Association, "StudentSchoolAssociation");

        assert_eq!(tables.len(), 1);
        assert_eq!(
            columns(&tables[0]),
            [
                ("StudentUniqueId", true, false),
                ("EntrySchoolId", true, false),
                ("EntryDate", true, false),
                ("ExitWithdrawDate", false, true),
                ("GradeLevelDescriptorId", false, false),
            ]
        );

        let targets: Vec<_> = tables[0].foreign_keys.iter().map(|fk| fk.foreign_table.as_str()).collect();
        assert_eq!(targets, ["Student", "School"]);
    }

    #[test]
    fn collections_and_commons_get_child_tables() {
        let schema = tables(SchemaBuilder::new().namespace(core()));
        let tables = tables_of(&schema, "EdFi", ModelType::DomainEntity, "Student");

        let names: Vec<_> = tables.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["edfi.Student", "edfi.StudentAddress", "edfi.StudentScore"]);

        assert_eq!(
            columns(&tables[0]),
            [
                ("StudentUniqueId", true, false),
                ("FirstName", false, false),
                ("LastSurname", false, true),
            ]
        );
        assert_eq!(
            columns(&tables[1]),
            [
                ("StudentUniqueId", true, false),
                ("StreetNumberName", true, false),
                ("City", false, false),
            ]
        );
        assert_eq!(
            tables[1].column("City").unwrap().column_type,
            ColumnType::String { max_length: 30 }
        );
        assert_eq!(tables[2].primary_key().count(), 2);
    }

    #[test]
    fn subclass_keys_reference_the_base_table() {
        let schema = tables(
            SchemaBuilder::new().namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(
                        EntityBuilder::abstract_entity("EducationOrganization")
                            .property(PropertyBuilder::integer("EducationOrganizationId").identity()),
                    )
                    .entity(
                        EntityBuilder::domain_entity_subclass("School", "EducationOrganization")
                            .property(PropertyBuilder::integer("SchoolId").identity_rename("EducationOrganizationId"))
                            .property(PropertyBuilder::short("SchoolYear")),
                    ),
            ),
        );
        let school = &tables_of(&schema, "EdFi", ModelType::DomainEntitySubclass, "School")[0];

        assert_eq!(
            columns(school),
            [("SchoolId", true, false), ("SchoolYear", false, false)]
        );
        assert_eq!(
            school.foreign_keys,
            [ForeignKey {
                columns: vec!["SchoolId".into()],
                foreign_schema: "edfi".into(),
                foreign_table: "EducationOrganization".into(),
                foreign_columns: vec!["EducationOrganizationId".into()],
            }]
        );
    }

    #[test]
    fn extensions_live_in_their_own_schema() {
        let schema = tables(
            SchemaBuilder::new().namespace(core()).namespace(
                NamespaceBuilder::extension("Sample", "Sample")
                    .dependency("EdFi")
                    .entity(
                        EntityBuilder::domain_entity_extension("Student")
                            .base_namespace("EdFi")
                            .property(PropertyBuilder::boolean("IsVeteran").optional()),
                    ),
            ),
        );
        let extension = &tables_of(&schema, "Sample", ModelType::DomainEntityExtension, "Student")[0];

        assert_eq!(extension.to_string(), "sample.StudentExtension");
        assert_eq!(
            columns(extension),
            [("StudentUniqueId", true, false), ("IsVeteran", false, true)]
        );
        assert_eq!(extension.foreign_keys[0].foreign_schema, "edfi");
    }

    #[test]
    fn descriptors_get_an_id_table() {
        let schema = tables(SchemaBuilder::new().namespace(core()));
        let table = &tables_of(&schema, "EdFi", ModelType::Descriptor, "GradeLevel")[0];

        assert_eq!(table.name, "GradeLevelDescriptor");
        assert_eq!(columns(table), [("GradeLevelDescriptorId", true, false)]);
    }

    #[test]
    fn missing_identity_data_is_reported() {
        let mut schema = linked(SchemaBuilder::new().namespace(core()));
        let err = run(&mut schema, &[&NamespaceSchemaNameEnhancer, &TableEnhancer]).unwrap_err();

        assert!(matches!(
            err,
            EnhancerError::MissingData { slot, .. } if slot == IDENTITY.slot()
        ));
    }
}
