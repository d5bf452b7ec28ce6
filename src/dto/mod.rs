pub mod head_hunter_dto;
pub mod super_job_dto;
pub mod vacancy_dto;
