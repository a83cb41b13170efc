pub mod auth;
pub mod chat;
pub mod contact_requests;
pub mod content;
pub mod financials;
pub mod messages;
pub mod payments;
pub mod profiles;
pub mod projects;
pub mod timesheet;

pub use auth::{login, AuthResponse, LoginRequest};
pub use chat::{chat, ChatRequest, ChatResponse};
pub use contact_requests::{
    create_contact_request, delete_contact_request, list_contact_requests,
    mark_contact_request_read, ContactRequestResponse, CreateContactRequest,
};
pub use content::{
    admin_list_products, admin_list_services, create_product, delete_product, landing_page,
    list_products, list_services, set_product_active, set_service_active, ProductResponse,
    ServiceResponse,
};
pub use financials::{
    create_record, delete_record, get_rates, list_records, CreateRecordRequest,
    FinancialRecordResponse, RecordKind,
};
pub use messages::{
    admin_send_message, admin_thread, mark_message_read, my_messages, send_message,
    MessageResponse, SendMessageRequest,
};
pub use payments::{checkout, CheckoutRequest, CheckoutResponse};
pub use profiles::{
    create_associate, get_associate, get_my_profile, list_associates, list_brands,
    update_associate, update_brand_logo, update_my_profile, CreateAssociateRequest,
    ProfileResponse, UpdateProfileRequest,
};
pub use projects::{
    create_project, delete_project, list_projects_for_associate, my_projects,
    update_project_hours, update_project_status, CreateProjectRequest, ProjectResponse,
};
pub use timesheet::{
    list_logs, manual_log, start_timer, stop_timer, timer_status, ManualLogRequest,
    ProjectLogResponse, StopTimerRequest,
};
