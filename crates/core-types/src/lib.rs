//! Core types shared by the stakepick validator selection pipeline.

mod account;
pub use account::{AccountId, AccountIdError, ACCOUNT_ID_HEX_LEN, ACCOUNT_ID_LEN};

mod criteria;
pub use criteria::{
    Criteria, Exclusion, COMMISSION_DENOMINATOR, DEFAULT_MAX_COMMISSION, DEFAULT_MAX_NOMINATORS,
    DEFAULT_MIN_OWN_STAKE, UNIT,
};

mod encoder;
pub use encoder::{AddressEncoder, EncodeError};

mod records;
pub use records::{DisplayData, ExposureRecord, IdentityRecord, SuperOfRecord, ValidatorRecord};

mod report;
pub use report::ReportRow;

mod storage;
pub use storage::{BlockRef, StorageEntry};

mod table;
pub use table::{Lookup, SlashFlags, Table};

pub mod serde_utils;
