//! 表单填写流程 - 流程层
//!
//! 核心职责：按固定顺序把个人资料写入当前页面
//!
//! 顺序：
//! 1. 姓名（拆分 / 全名，见 `fill_names`）
//! 2. 邮箱 → 电话 → 薪资 → LinkedIn → GitHub → 个人网站
//! 3. 简历上传
//! 4. 性别 → 国家 → 税务居住地 → 通知期 → 推荐人
//!
//! 每个字段相互独立，未命中不重试也不中断。

use tracing::{debug, info};

use crate::infrastructure::FormPage;
use crate::models::Profile;
use crate::services::{FieldResolver, SemanticField};
use crate::workflow::job_ctx::JobCtx;

/// 姓名之后的填写顺序
pub const FILL_ORDER: [SemanticField; 12] = [
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

/// 姓名的填写方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLayout {
    /// 名和姓分开填写
    Split,
    /// 只有一个全名框
    Full,
    /// 没有明确的结构，逐个按标签尝试
    Fallback,
}

/// 填写结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub filled: Vec<&'static str>,
    pub missed: Vec<&'static str>,
}

impl FillSummary {
    fn record(&mut self, field: SemanticField, filled: bool) {
        if filled {
            self.filled.push(field.id());
        } else {
            self.missed.push(field.id());
        }
    }
}

/// 表单填写流程
///
/// - 不持有页面
/// - 只依赖 FieldResolver
#[derive(Debug, Clone, Copy, Default)]
pub struct FillFlow {
    resolver: FieldResolver,
}

impl FillFlow {
    pub fn new() -> Self {
        Self {
            resolver: FieldResolver::new(),
        }
    }

    pub async fn run<P: FormPage>(&self, page: &P, profile: &Profile, ctx: &JobCtx) -> FillSummary {
        info!("{} ✍️ 开始填写表单", ctx);
        let mut summary = FillSummary::default();

        let layout = self.fill_names(page, profile, &mut summary).await;
        debug!("{} 姓名填写方式: {:?}", ctx, layout);

        for field in FILL_ORDER {
            let value = profile_value(profile, field);
            // 资料里没有的字段不计入未命中
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                continue;
            }
            let filled = self.resolver.resolve(page, field, value.as_deref()).await;
            summary.record(field, filled);
        }

        info!(
            "{} 填写完成: 成功 {} 个，未找到 {} 个",
            ctx,
            summary.filled.len(),
            summary.missed.len()
        );
        if !summary.missed.is_empty() {
            debug!("{} 未找到: {}", ctx, summary.missed.join(", "));
        }
        summary
    }

    /// 姓名特例
    ///
    /// 名、姓控件都存在且不同 → 分别填写；都不存在但有严格全名框 → 写入 "名 姓"；
    /// 名、姓命中同一个控件时把它当作全名框；其余情况逐个按标签尝试。
    pub async fn fill_names<P: FormPage>(&self, page: &P, profile: &Profile, summary: &mut FillSummary) -> NameLayout {
        let first = self.resolver.locate(page, SemanticField::FirstName).await;
        let last = self.resolver.locate(page, SemanticField::LastName).await;

        match (first, last) {
            (Some(first), Some(last)) if first != last => {
                let ok = self
                    .resolver
                    .write_located(page, SemanticField::FirstName, &first, &profile.first_name)
                    .await;
                summary.record(SemanticField::FirstName, ok);
                let ok = self
                    .resolver
                    .write_located(page, SemanticField::LastName, &last, &profile.last_name)
                    .await;
                summary.record(SemanticField::LastName, ok);
                NameLayout::Split
            }
            (Some(first), Some(last)) => {
                debug!("名和姓命中同一个控件 {}，按全名填写", first);
                let ok = self
                    .resolver
                    .write_located(page, SemanticField::FullName, &last, &profile.full_name())
                    .await;
                summary.record(SemanticField::FullName, ok);
                NameLayout::Full
            }
            (None, None) => match self.resolver.locate(page, SemanticField::FullName).await {
                Some(full) => {
                    let ok = self
                        .resolver
                        .write_located(page, SemanticField::FullName, &full, &profile.full_name())
                        .await;
                    summary.record(SemanticField::FullName, ok);
                    NameLayout::Full
                }
                None => {
                    summary.record(SemanticField::FirstName, false);
                    summary.record(SemanticField::LastName, false);
                    NameLayout::Fallback
                }
            },
            _ => {
                for (field, value) in [
                    (SemanticField::FirstName, &profile.first_name),
                    (SemanticField::LastName, &profile.last_name),
                ] {
                    let ok = self.resolver.resolve(page, field, Some(value.as_str())).await;
                    summary.record(field, ok);
                }
                NameLayout::Fallback
            }
        }
    }
}

/// 字段对应的资料值
pub fn profile_value(profile: &Profile, field: SemanticField) -> Option<String> {
    match field {
        SemanticField::FirstName => Some(profile.first_name.clone()),
        SemanticField::LastName => Some(profile.last_name.clone()),
        SemanticField::FullName => Some(profile.full_name()),
        SemanticField::Email => Some(profile.email.clone()),
        SemanticField::Phone => profile.phone.clone(),
        SemanticField::Salary => profile.salary.clone(),
        SemanticField::Linkedin => profile.linkedin.clone(),
        SemanticField::Github => profile.github.clone(),
        SemanticField::Website => profile.homepage().map(str::to_string),
        SemanticField::Cv => Some(profile.resume_path.to_string_lossy().into_owned()),
        SemanticField::Gender => profile.gender.clone(),
        SemanticField::Country => profile.location.clone(),
        SemanticField::TaxResidence => profile.tax_residence.clone(),
        SemanticField::NoticePeriod => profile.notice_period.clone(),
        SemanticField::Referral => profile.referred_by.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn profile() -> Profile {
        Profile {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            resume_path: PathBuf::from("/home/ada/cv.pdf"),
            phone: None,
            personal_url: None,
            linkedin: Some("https://linkedin.com/in/ada".into()),
            github: None,
            website: Some("https://ada.dev".into()),
            gender: Some("Female".into()),
            location: Some("United Kingdom".into()),
            tax_residence: None,
            notice_period: None,
            salary: None,
            referred_by: None,
        }
    }

    #[test]
    fn test_fill_order_skips_names() {
        assert!(!FILL_ORDER.contains(&SemanticField::FirstName));
        assert!(!FILL_ORDER.contains(&SemanticField::FullName));
        assert_eq!(FILL_ORDER[0], SemanticField::Email);
        let cv = FILL_ORDER.iter().position(|f| *f == SemanticField::Cv).unwrap();
        let gender = FILL_ORDER.iter().position(|f| *f == SemanticField::Gender).unwrap();
        assert!(cv < gender);
    }

    #[test]
    fn test_profile_values() {
        let p = profile();
        assert_eq!(profile_value(&p, SemanticField::FullName).as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile_value(&p, SemanticField::Website).as_deref(), Some("https://ada.dev"));
        assert_eq!(profile_value(&p, SemanticField::Country).as_deref(), Some("United Kingdom"));
        assert_eq!(profile_value(&p, SemanticField::Cv).as_deref(), Some("/home/ada/cv.pdf"));
        assert_eq!(profile_value(&p, SemanticField::Phone), None);
    }
}
