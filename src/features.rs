// Feature flags enumerating which WebAssembly extensions the module under
// validation is allowed to use. The declaration validator gates declared types
// against these, and the body validator consults an operator's required
// feature once per step.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeatureSpec {
    pub mvp: bool,
    pub simd: bool,
    pub reference_types: bool,
    pub bulk_memory_operations: bool,
    pub shared_tables: bool,
    pub atomics: bool,
    pub multiple_results_and_block_params: bool,
    pub exception_handling: bool,
    pub import_export_mutable_globals: bool,
    // Policy flag, not a capability: when set, atomic operators are rejected
    // unless the default memory is shared.
    pub require_shared_flag_for_atomic_operators: bool,
    // Policy flag: when set, a `try` frame may be closed directly by `end`
    // instead of requiring at least one catch clause.
    pub allow_end_after_try: bool,
}

impl Default for FeatureSpec {
    // The standardized feature set: MVP plus the extensions that have been
    // merged into the spec proper.
    fn default() -> Self {
        Self {
            mvp: true,
            simd: false,
            reference_types: false,
            bulk_memory_operations: false,
            shared_tables: false,
            atomics: false,
            multiple_results_and_block_params: true,
            exception_handling: false,
            import_export_mutable_globals: true,
            require_shared_flag_for_atomic_operators: true,
            allow_end_after_try: false,
        }
    }
}

impl FeatureSpec {
    pub fn new() -> Self {
        Self::default()
    }

    // Every capability enabled; the policy flags keep their standard values.
    pub fn all() -> Self {
        Self {
            mvp: true,
            simd: true,
            reference_types: true,
            bulk_memory_operations: true,
            shared_tables: true,
            atomics: true,
            multiple_results_and_block_params: true,
            exception_handling: true,
            import_export_mutable_globals: true,
            require_shared_flag_for_atomic_operators: true,
            allow_end_after_try: false,
        }
    }

    pub fn mvp_only() -> Self {
        Self {
            mvp: true,
            simd: false,
            reference_types: false,
            bulk_memory_operations: false,
            shared_tables: false,
            atomics: false,
            multiple_results_and_block_params: false,
            exception_handling: false,
            import_export_mutable_globals: false,
            require_shared_flag_for_atomic_operators: true,
            allow_end_after_try: false,
        }
    }

    #[inline]
    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Mvp => self.mvp,
            Feature::Simd => self.simd,
            Feature::ReferenceTypes => self.reference_types,
            Feature::BulkMemoryOperations => self.bulk_memory_operations,
            Feature::SharedTables => self.shared_tables,
            Feature::Atomics => self.atomics,
            Feature::MultiValue => self.multiple_results_and_block_params,
            Feature::ExceptionHandling => self.exception_handling,
            Feature::ImportExportMutableGlobals => self.import_export_mutable_globals,
        }
    }
}

// The capability an operator or declared type may require. Policy flags are
// not listed here; they are consulted directly where they apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Feature {
    Mvp,
    Simd,
    ReferenceTypes,
    BulkMemoryOperations,
    SharedTables,
    Atomics,
    MultiValue,
    ExceptionHandling,
    ImportExportMutableGlobals,
}

impl Feature {
    pub fn name(self) -> &'static str {
        match self {
            Feature::Mvp => "mvp",
            Feature::Simd => "simd",
            Feature::ReferenceTypes => "reference-types",
            Feature::BulkMemoryOperations => "bulk-memory-operations",
            Feature::SharedTables => "shared-tables",
            Feature::Atomics => "atomics",
            Feature::MultiValue => "multivalue",
            Feature::ExceptionHandling => "exception-handling",
            Feature::ImportExportMutableGlobals => "mutable-globals",
        }
    }
}
