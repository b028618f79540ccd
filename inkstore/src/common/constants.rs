// doc constants
pub const DOC_ID: &str = "_id";
pub const DOC_REVISION: &str = "_revision";
pub const RESERVED_FIELDS: [&str; 2] = [DOC_ID, DOC_REVISION];

// Compile-time assertion for reserved fields count
const _: () = {
    const RESERVED_FIELDS_COUNT: usize = 2;
    const ACTUAL_COUNT: usize = RESERVED_FIELDS.len();
    const _: [(); 1] = [(); (ACTUAL_COUNT == RESERVED_FIELDS_COUNT) as usize];
};

// timestamp fields, maintained only for collections that opt in
pub const DOC_CREATED: &str = "created_at";
pub const DOC_UPDATED: &str = "updated_at";

// transaction constants
pub const DEFAULT_MAX_RETRIES: u32 = 5;

pub const INKSTORE_VERSION: &str = env!("CARGO_PKG_VERSION");
