//! 字段 / 标签注册表 - 业务能力层
//!
//! 纯静态数据：每个语义字段的多语言标签，以及少数字段的结构化模式。
//! 列表顺序就是优先级：更具体、更常见的写法排在前面。

use phf::phf_map;

use crate::infrastructure::driver::AttrPattern;

/// 字段的写入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 文本输入
    Text,
    /// 下拉选择
    Select,
    /// 单选组
    Choice,
    /// 文件上传
    File,
}

/// 语义字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticField {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Salary,
    Linkedin,
    Github,
    Website,
    Cv,
    Gender,
    Country,
    TaxResidence,
    NoticePeriod,
    Referral,
}

impl SemanticField {
    pub const ALL: [SemanticField; 15] = [
        SemanticField::FirstName,
        SemanticField::LastName,
        SemanticField::FullName,
        SemanticField::Email,
        SemanticField::Phone,
        SemanticField::Salary,
        SemanticField::Linkedin,
        SemanticField::Github,
        SemanticField::Website,
        SemanticField::Cv,
        SemanticField::Gender,
        SemanticField::Country,
        SemanticField::TaxResidence,
        SemanticField::NoticePeriod,
        SemanticField::Referral,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SemanticField::FirstName => "first_name",
            SemanticField::LastName => "last_name",
            SemanticField::FullName => "full_name",
            SemanticField::Email => "email",
            SemanticField::Phone => "phone",
            SemanticField::Salary => "salary",
            SemanticField::Linkedin => "linkedin",
            SemanticField::Github => "github",
            SemanticField::Website => "website",
            SemanticField::Cv => "cv",
            SemanticField::Gender => "gender",
            SemanticField::Country => "country",
            SemanticField::TaxResidence => "tax_residence",
            SemanticField::NoticePeriod => "notice_period",
            SemanticField::Referral => "referral",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SemanticField::Cv => FieldKind::File,
            SemanticField::Gender => FieldKind::Choice,
            SemanticField::Country | SemanticField::TaxResidence => FieldKind::Select,
            _ => FieldKind::Text,
        }
    }

    /// 全名只接受严格匹配，避免把 "First name" 当成全名
    pub fn is_strict(self) -> bool {
        matches!(self, SemanticField::FullName)
    }

    /// 是否允许“附近文本”兜底（只给通用字段用）
    pub fn allows_nearby_text(self) -> bool {
        matches!(
            self,
            SemanticField::Phone
                | SemanticField::Salary
                | SemanticField::Website
                | SemanticField::NoticePeriod
                | SemanticField::Referral
                | SemanticField::Country
                | SemanticField::TaxResidence
        )
    }

    /// 附近文本兜底使用的关键字（字段名的小写形式）
    pub fn nearby_text(self) -> String {
        self.id().replace('_', " ")
    }
}

/// 标签表：字段 id → 有序标签
static LABELS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "first_name" => FIRST_NAME_LABELS,
    "last_name" => LAST_NAME_LABELS,
    "full_name" => FULL_NAME_LABELS,
    "email" => EMAIL_LABELS,
    "phone" => PHONE_LABELS,
    "salary" => SALARY_LABELS,
    "linkedin" => LINKEDIN_LABELS,
    "github" => GITHUB_LABELS,
    "website" => WEBSITE_LABELS,
    "cv" => CV_LABELS,
    "gender" => GENDER_LABELS,
    "country" => COUNTRY_LABELS,
    "tax_residence" => TAX_RESIDENCE_LABELS,
    "notice_period" => NOTICE_PERIOD_LABELS,
    "referral" => REFERRAL_LABELS,
};

const FIRST_NAME_LABELS: &[&str] = &["First name", "First Name", "Given name", "Forename", "Vorname", "Prénom", "Voornaam", "名字"];
const LAST_NAME_LABELS: &[&str] = &["Last name", "Last Name", "Surname", "Family name", "Nachname", "Familienname", "Nom de famille", "Apellido", "Cognome", "Achternaam", "姓氏"];
const FULL_NAME_LABELS: &[&str] = &["Full name", "Full Name", "Name", "Your name", "Vollständiger Name", "Nom complet", "Nombre completo", "姓名"];
const EMAIL_LABELS: &[&str] = &["Email", "E-mail", "Email address", "E-Mail-Adresse", "E-Mail", "Adresse e-mail", "Correo electrónico", "邮箱"];
const PHONE_LABELS: &[&str] = &["Phone", "Phone number", "Mobile", "Telephone", "Telefonnummer", "Telefon", "Handynummer", "Téléphone", "Teléfono", "电话"];
const SALARY_LABELS: &[&str] = &["Salary expectations", "Expected salary", "Desired salary", "Salary", "Compensation", "Gehaltsvorstellung", "Gehaltswunsch", "Gehalt", "Prétentions salariales", "薪资"];
const LINKEDIN_LABELS: &[&str] = &["LinkedIn profile", "LinkedIn URL", "LinkedIn", "Linkedin"];
const GITHUB_LABELS: &[&str] = &["GitHub profile", "GitHub URL", "GitHub", "Github"];
const WEBSITE_LABELS: &[&str] = &["Personal website", "Portfolio URL", "Portfolio", "Website", "Personal URL", "Webseite", "Homepage", "Site web"];
const CV_LABELS: &[&str] = &["Resume/CV", "Resume", "CV", "Curriculum vitae", "Lebenslauf", "Upload resume", "Attach resume", "简历"];
const GENDER_LABELS: &[&str] = &["Gender", "Sex", "Geschlecht", "Genre", "Género", "性别"];
const COUNTRY_LABELS: &[&str] = &["Country of residence", "Country", "Location", "Land", "Wohnort", "Pays", "País", "国家"];
const TAX_RESIDENCE_LABELS: &[&str] = &["Tax residence", "Country of tax residence", "Tax residency", "Steuerlicher Wohnsitz", "Résidence fiscale"];
const NOTICE_PERIOD_LABELS: &[&str] = &["Notice period", "Earliest start date", "Availability", "Kündigungsfrist", "Frühester Eintrittstermin", "Préavis"];
const REFERRAL_LABELS: &[&str] = &["Referred by", "Referral", "Who referred you", "How did you hear about us", "Empfohlen von", "Wie sind Sie auf uns aufmerksam geworden"];

/// 结构化模式表：只给名字类和几个高价值字段
static PATTERNS: phf::Map<&'static str, &'static [AttrPattern]> = phf_map! {
    "first_name" => FIRST_NAME_PATTERNS,
    "last_name" => LAST_NAME_PATTERNS,
    "full_name" => FULL_NAME_PATTERNS,
    "email" => EMAIL_PATTERNS,
    "phone" => PHONE_PATTERNS,
    "linkedin" => LINKEDIN_PATTERNS,
    "github" => GITHUB_PATTERNS,
};

const FIRST_NAME_PATTERNS: &[AttrPattern] = &[
    AttrPattern::equals("autocomplete", "given-name"),
    AttrPattern::contains("name", "first"),
    AttrPattern::contains("id", "first"),
    AttrPattern::contains("name", "vorname"),
    AttrPattern::contains("placeholder", "first"),
];

const LAST_NAME_PATTERNS: &[AttrPattern] = &[
    AttrPattern::equals("autocomplete", "family-name"),
    AttrPattern::contains("name", "last"),
    AttrPattern::contains("id", "last"),
    AttrPattern::contains("name", "surname"),
    AttrPattern::contains("name", "nachname"),
    AttrPattern::contains("placeholder", "last"),
];

const FULL_NAME_PATTERNS: &[AttrPattern] = &[
    AttrPattern::equals("autocomplete", "name"),
    AttrPattern::equals("name", "name"),
    AttrPattern::equals("id", "name"),
    AttrPattern::equals("name", "full_name"),
    AttrPattern::equals("name", "fullname"),
    AttrPattern::equals("id", "full_name"),
];

const EMAIL_PATTERNS: &[AttrPattern] = &[
    AttrPattern::equals("type", "email"),
    AttrPattern::equals("autocomplete", "email"),
    AttrPattern::contains("name", "email"),
    AttrPattern::contains("id", "email"),
];

const PHONE_PATTERNS: &[AttrPattern] = &[
    AttrPattern::equals("type", "tel"),
    AttrPattern::equals("autocomplete", "tel"),
    AttrPattern::contains("name", "phone"),
    AttrPattern::contains("id", "phone"),
];

const LINKEDIN_PATTERNS: &[AttrPattern] = &[
    AttrPattern::contains("name", "linkedin"),
    AttrPattern::contains("id", "linkedin"),
    AttrPattern::contains("name", "linked_in"),
    AttrPattern::contains("placeholder", "linkedin.com"),
];

const GITHUB_PATTERNS: &[AttrPattern] = &[
    AttrPattern::contains("name", "github"),
    AttrPattern::contains("id", "github"),
    AttrPattern::contains("placeholder", "github.com"),
];

/// 字段的有序标签
pub fn labels_of(field: SemanticField) -> &'static [&'static str] {
    LABELS.get(field.id()).copied().unwrap_or(&[])
}

/// 字段的有序结构化模式（没有时为空）
pub fn structural_patterns_of(field: SemanticField) -> &'static [AttrPattern] {
    PATTERNS.get(field.id()).copied().unwrap_or(&[])
}

/// 提交类按钮的名称（自动提交模式使用）
pub const SUBMIT_LABELS: &[&str] = &[
    "Submit application",
    "Apply now",
    "Apply",
    "Submit",
    "Send application",
    "Bewerbung absenden",
    "Jetzt bewerben",
    "Bewerben",
    "Absenden",
    "Postuler",
    "Envoyer",
    "Enviar solicitud",
    "Enviar",
    "Candidatar",
    "提交",
];
