//! Integration tests for `SqliteCatalog` against an in-memory database.

use collegespace_core::{
  catalog::{
    CatalogGateway, GatewayError as _, NewBranch, NewResource, NewSubject,
    NewUniversity, Scope,
  },
  resource::{ResourceKind, Semester},
};
use uuid::Uuid;

use crate::{Error, SqliteCatalog};

async fn store() -> SqliteCatalog {
  SqliteCatalog::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sem(n: u8) -> Semester { Semester::new(n).unwrap() }

async fn university(s: &SqliteCatalog, name: &str) -> Uuid {
  s.add_university(NewUniversity {
    name: name.into(),
    location: "Delhi".into(),
    ..NewUniversity::default()
  })
  .await
  .unwrap()
  .id
}

async fn branch(s: &SqliteCatalog, university_id: Uuid, name: &str) -> Uuid {
  s.add_branch(NewBranch {
    university_id,
    name: name.into(),
    code: None,
    description: String::new(),
  })
  .await
  .unwrap()
  .id
}

async fn subject(
  s: &SqliteCatalog,
  branch_id: Option<Uuid>,
  name: &str,
  semester: u8,
) -> Uuid {
  s.add_subject(NewSubject {
    branch_id,
    name: name.into(),
    description: String::new(),
    semester: sem(semester),
    credits: 4,
  })
  .await
  .unwrap()
  .id
}

fn resource(subject_id: Uuid, title: &str, raw_type: &str) -> NewResource {
  NewResource {
    subject_id,
    title: title.into(),
    description: None,
    raw_type: raw_type.into(),
    file_url: Some("https://files.example.com/pdfs/a.pdf".into()),
  }
}

// ─── Resources ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_resource() {
  let s = store().await;
  let subj = subject(&s, None, "Electronics", 3).await;

  let added = s
    .add_resource(resource(subj, "Digital Electronics Complete Notes", "pdf"))
    .await
    .unwrap();
  assert_eq!(added.kind, ResourceKind::Notes);
  assert_eq!(added.subject, "Electronics");
  assert_eq!(added.subject_id, Some(subj));
  assert_eq!(added.semester, sem(3));
  assert_eq!(added.view_count, 0);

  let fetched = s.get_resource(added.id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
}

#[tokio::test]
async fn get_resource_missing_returns_none() {
  let s = store().await;
  assert!(s.get_resource(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn raw_types_are_canonicalised() {
  let s = store().await;
  let subj = subject(&s, None, "Mathematics", 1).await;

  for (raw, kind) in [
    ("pdf", ResourceKind::Notes),
    ("notes", ResourceKind::Notes),
    ("question_paper", ResourceKind::Paper),
    ("Paper", ResourceKind::Paper),
    ("solution", ResourceKind::Book),
    ("book", ResourceKind::Book),
    ("video", ResourceKind::Notes),
  ] {
    let r = s.add_resource(resource(subj, raw, raw)).await.unwrap();
    assert_eq!(r.kind, kind, "raw type {raw}");
  }
}

#[tokio::test]
async fn list_resources_newest_first() {
  let s = store().await;
  let subj = subject(&s, None, "Mathematics", 1).await;

  let first = s.add_resource(resource(subj, "First", "pdf")).await.unwrap();
  let second = s.add_resource(resource(subj, "Second", "pdf")).await.unwrap();
  let third = s.add_resource(resource(subj, "Third", "pdf")).await.unwrap();

  let all = s.list_resources(&Scope::all()).await.unwrap();
  let ids: Vec<_> = all.iter().map(|r| r.id).collect();
  assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn list_resources_empty_store() {
  let s = store().await;
  assert!(s.list_resources(&Scope::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn scope_by_semester() {
  let s = store().await;
  let sem3 = subject(&s, None, "Electronics", 3).await;
  let sem4 = subject(&s, None, "Computer Science", 4).await;
  s.add_resource(resource(sem3, "Digital Electronics", "pdf")).await.unwrap();
  s.add_resource(resource(sem4, "DBMS Notes", "pdf")).await.unwrap();
  s.add_resource(resource(sem3, "Signals Paper", "question_paper")).await.unwrap();

  let in3 = s.list_resources(&Scope::semester(sem(3))).await.unwrap();
  assert_eq!(in3.len(), 2);
  assert!(in3.iter().all(|r| r.semester == sem(3)));

  let in7 = s.list_resources(&Scope::semester(sem(7))).await.unwrap();
  assert!(in7.is_empty());
}

#[tokio::test]
async fn scope_by_university_id_and_name() {
  let s = store().await;
  let du = university(&s, "Delhi University").await;
  let iit = university(&s, "IIT Delhi").await;
  let du_cs = branch(&s, du, "Computer Science").await;
  let iit_me = branch(&s, iit, "Mechanical").await;

  let a = subject(&s, Some(du_cs), "Operating Systems", 5).await;
  let b = subject(&s, Some(iit_me), "Thermodynamics", 3).await;
  let orphan = subject(&s, None, "Mathematics", 1).await;

  let os = s.add_resource(resource(a, "OS Notes", "pdf")).await.unwrap();
  s.add_resource(resource(b, "Thermo Paper", "paper")).await.unwrap();
  s.add_resource(resource(orphan, "Calculus", "book")).await.unwrap();

  let by_id = s.list_resources(&Scope::university(du)).await.unwrap();
  assert_eq!(by_id.len(), 1);
  assert_eq!(by_id[0].id, os.id);

  let by_name = s
    .list_resources(&Scope {
      university_name: Some("Delhi University".into()),
      ..Scope::default()
    })
    .await
    .unwrap();
  assert_eq!(by_name, by_id);

  let unknown = s.list_resources(&Scope::university(Uuid::new_v4())).await.unwrap();
  assert!(unknown.is_empty());
}

#[tokio::test]
async fn scope_by_subject() {
  let s = store().await;
  let a = subject(&s, None, "Electronics", 3).await;
  let b = subject(&s, None, "Mechanical", 3).await;
  s.add_resource(resource(a, "A1", "pdf")).await.unwrap();
  s.add_resource(resource(a, "A2", "paper")).await.unwrap();
  s.add_resource(resource(b, "B1", "pdf")).await.unwrap();

  let only_a = s.list_resources(&Scope::subject(a)).await.unwrap();
  assert_eq!(only_a.len(), 2);
  assert!(only_a.iter().all(|r| r.subject_id == Some(a)));
}

#[tokio::test]
async fn scope_fields_combine() {
  let s = store().await;
  let a = subject(&s, None, "Electronics", 3).await;
  s.add_resource(resource(a, "A1", "pdf")).await.unwrap();

  let scope = Scope { semester: Some(sem(4)), ..Scope::subject(a) };
  assert!(s.list_resources(&scope).await.unwrap().is_empty());
}

#[tokio::test]
async fn record_view_increments() {
  let s = store().await;
  let subj = subject(&s, None, "Electronics", 3).await;
  let r = s.add_resource(resource(subj, "Notes", "pdf")).await.unwrap();

  s.record_view(r.id).await.unwrap();
  let after = s.record_view(r.id).await.unwrap().unwrap();
  assert_eq!(after.view_count, 2);
  assert_eq!(s.get_resource(r.id).await.unwrap().unwrap().view_count, 2);
}

#[tokio::test]
async fn record_view_missing_returns_none() {
  let s = store().await;
  assert!(s.record_view(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_resource() {
  let s = store().await;
  let subj = subject(&s, None, "Electronics", 3).await;
  let r = s.add_resource(resource(subj, "Notes", "pdf")).await.unwrap();

  assert!(s.delete_resource(r.id).await.unwrap());
  assert!(s.get_resource(r.id).await.unwrap().is_none());
  assert!(!s.delete_resource(r.id).await.unwrap());
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_resource_rejects_blank_title() {
  let s = store().await;
  let subj = subject(&s, None, "Electronics", 3).await;

  let err = s.add_resource(resource(subj, "   ", "pdf")).await.unwrap_err();
  assert!(matches!(err, Error::Core(collegespace_core::Error::EmptyTitle)));
  assert!(err.is_invalid_input());
}

#[tokio::test]
async fn add_resource_rejects_relative_url() {
  let s = store().await;
  let subj = subject(&s, None, "Electronics", 3).await;

  let mut input = resource(subj, "Notes", "pdf");
  input.file_url = Some("/pdfs/notes.pdf".into());
  let err = s.add_resource(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(collegespace_core::Error::InvalidUrl { .. })
  ));
}

#[tokio::test]
async fn add_resource_blank_url_means_absent() {
  let s = store().await;
  let subj = subject(&s, None, "Electronics", 3).await;

  let mut input = resource(subj, "Notes", "pdf");
  input.file_url = Some("  ".into());
  let r = s.add_resource(input).await.unwrap();
  assert!(r.file_url.is_none());
}

#[tokio::test]
async fn add_resource_unknown_subject() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let err = s.add_resource(resource(missing, "Notes", "pdf")).await.unwrap_err();
  assert!(matches!(err, Error::SubjectNotFound(id) if id == missing));
}

#[tokio::test]
async fn add_branch_unknown_university() {
  let s = store().await;
  let err = s
    .add_branch(NewBranch {
      university_id: Uuid::new_v4(),
      name:          "Civil".into(),
      code:          None,
      description:   String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UniversityNotFound(_)));
}

#[tokio::test]
async fn add_subject_unknown_branch() {
  let s = store().await;
  let err = s
    .add_subject(NewSubject {
      branch_id:   Some(Uuid::new_v4()),
      name:        "Surveying".into(),
      description: String::new(),
      semester:    sem(2),
      credits:     3,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::BranchNotFound(_)));
}

#[tokio::test]
async fn blank_names_rejected() {
  let s = store().await;
  let err = s.add_university(NewUniversity::default()).await.unwrap_err();
  assert!(matches!(err, Error::Blank(_)));
  assert!(err.is_invalid_input());
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn universities_roundtrip() {
  let s = store().await;
  let id = s
    .add_university(NewUniversity {
      name: "Delhi Technological University".into(),
      description: "Formerly DCE".into(),
      location: "Delhi".into(),
      website: Some("https://dtu.ac.in".into()),
      image_url: Some(String::new()),
      established: Some(1941),
    })
    .await
    .unwrap()
    .id;
  university(&s, "Anna University").await;

  let all = s.list_universities().await.unwrap();
  let names: Vec<_> = all.iter().map(|u| u.name.as_str()).collect();
  assert_eq!(names, vec!["Anna University", "Delhi Technological University"]);

  let dtu = s.get_university(id).await.unwrap().unwrap();
  assert_eq!(dtu.established, Some(1941));
  assert_eq!(dtu.website.as_deref(), Some("https://dtu.ac.in"));
  assert!(dtu.image_url.is_none());

  assert!(s.get_university(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn branches_listed_per_university() {
  let s = store().await;
  let du = university(&s, "Delhi University").await;
  let other = university(&s, "Other").await;
  branch(&s, du, "Mechanical").await;
  branch(&s, du, "Computer Science").await;
  branch(&s, other, "Civil").await;

  let names: Vec<_> = s
    .list_branches(du)
    .await
    .unwrap()
    .into_iter()
    .map(|b| b.name)
    .collect();
  assert_eq!(names, vec!["Computer Science", "Mechanical"]);
}

#[tokio::test]
async fn subjects_by_semester_sorted_by_name() {
  let s = store().await;
  subject(&s, None, "Signals", 3).await;
  subject(&s, None, "Analog Circuits", 3).await;
  subject(&s, None, "Compilers", 6).await;

  let all = s.list_subjects(None).await.unwrap();
  assert_eq!(all.len(), 3);

  let names: Vec<_> = s
    .list_subjects(Some(sem(3)))
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.name)
    .collect();
  assert_eq!(names, vec!["Analog Circuits", "Signals"]);
}

#[tokio::test]
async fn open_file_persists() {
  let dir = std::env::temp_dir().join(format!("collegespace-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("catalog.db");

  {
    let s = SqliteCatalog::open(&path).await.unwrap();
    university(&s, "Delhi University").await;
  }
  let s = SqliteCatalog::open(&path).await.unwrap();
  assert_eq!(s.list_universities().await.unwrap().len(), 1);

  std::fs::remove_dir_all(&dir).ok();
}
