pub mod invoice_auto_sync;
pub mod master_data_sync;
