//! Built-in Cocoa AI knowledge: the solution catalog, requirements profile,
//! and implementation paths served when no fixture file is configured.

use avatarline_core::knowledge::{ImplementationPath, RequirementsProfile, Solution};
use std::collections::BTreeMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn solutions() -> Vec<Solution> {
    let solution = |id: &str, name: &str, topic: &str, content: &str| Solution {
        id: id.into(),
        name: name.into(),
        topic: topic.into(),
        content: content.into(),
    };

    vec![
        solution(
            "ID-010",
            "Conversational AI Solutions",
            "customer service",
            "Cocoa AI provides intelligent chatbot and voice assistant solutions that can handle customer inquiries 24/7. Our solutions integrate with existing CRM systems and can reduce response times by 40-60% while improving customer satisfaction by 30%. Typical ROI is achieved within 6-8 months. Implementation includes natural language processing, multi-channel support (web, mobile, voice), and seamless handoff to human agents when needed.",
        ),
        solution(
            "ID-020",
            "AI-Powered Support Automation",
            "customer service automation",
            "Our AI support automation includes ticket routing, sentiment analysis, and predictive support. The system learns from historical data to proactively identify customer issues before they escalate. Implementation typically takes 8-12 weeks with full integration support. Features include automated ticket classification, priority scoring, and intelligent agent assignment based on expertise and workload.",
        ),
        solution(
            "ID-030",
            "Process Automation & RPA",
            "process automation",
            "Cocoa AI's process automation solutions combine RPA (Robotic Process Automation) with AI to automate repetitive business processes. Common use cases include invoice processing, data entry, report generation, and compliance monitoring. Clients typically see 50-70% reduction in manual processing time and 90%+ accuracy improvements. Solutions scale from department-level to enterprise-wide deployments.",
        ),
        solution(
            "ID-040",
            "Predictive Analytics & Data Intelligence",
            "data analytics",
            "Our predictive analytics platform uses machine learning to uncover insights from your business data. Applications include customer churn prediction, demand forecasting, inventory optimization, and sales forecasting. The platform integrates with existing data warehouses and business intelligence tools. Clients report 20-40% improvement in forecast accuracy and 15-25% increase in operational efficiency.",
        ),
        solution(
            "ID-050",
            "Custom AI Model Development",
            "custom AI",
            "For unique business challenges, Cocoa AI develops custom AI models tailored to your specific needs. Our process includes requirements gathering, data analysis, model training, validation, and deployment. We support computer vision, natural language processing, recommendation systems, and more. Projects typically range from 12-24 weeks depending on complexity and include ongoing model monitoring and optimization.",
        ),
        solution(
            "ID-060",
            "AI Implementation Packages",
            "implementation",
            "Cocoa AI offers three implementation packages: Starter (8-12 weeks, single department, $50-100K), Growth (16-20 weeks, multi-department, $150-300K), and Enterprise (24+ weeks, company-wide, custom pricing). All packages include strategy consultation, technical implementation, team training, and 6 months of post-launch support. Flexible payment options and ROI guarantees available for qualified clients.",
        ),
    ]
}

pub fn requirements_profile() -> RequirementsProfile {
    RequirementsProfile {
        industries_served: strings(&[
            "Retail & E-commerce",
            "Healthcare",
            "Financial Services",
            "Manufacturing",
            "Professional Services",
            "Technology",
            "Education",
            "Logistics & Supply Chain",
        ]),
        common_use_cases: strings(&[
            "Customer service automation",
            "Sales process optimization",
            "Inventory and demand forecasting",
            "Fraud detection and risk management",
            "Document processing and analysis",
            "Quality control and inspection",
            "Personalization and recommendations",
            "Operational efficiency improvements",
        ]),
        implementation_approach: BTreeMap::from([
            (
                "phase1".to_string(),
                "Discovery & Strategy (2-4 weeks): Business assessment, use case identification, ROI modeling".to_string(),
            ),
            (
                "phase2".to_string(),
                "Proof of Concept (4-6 weeks): Prototype development, pilot testing, stakeholder feedback".to_string(),
            ),
            (
                "phase3".to_string(),
                "Full Implementation (8-16 weeks): Production deployment, system integration, team training".to_string(),
            ),
            (
                "phase4".to_string(),
                "Optimization & Scale (Ongoing): Performance monitoring, model refinement, expansion planning".to_string(),
            ),
        ]),
        success_metrics: strings(&[
            "40-60% reduction in response times (customer service)",
            "30% improvement in customer satisfaction scores",
            "50-70% reduction in manual processing time",
            "20-40% improvement in forecast accuracy",
            "6-12 month typical ROI timeline",
            "90%+ accuracy in automated processes",
        ]),
    }
}

pub fn implementation_paths() -> Vec<ImplementationPath> {
    vec![
        ImplementationPath {
            solution_type: "conversational AI".into(),
            timeline: "8-12 weeks".into(),
            phases: strings(&[
                "Week 1-2: Requirements gathering and use case definition",
                "Week 3-4: Design conversation flows and integrations",
                "Week 5-8: Development and training with sample data",
                "Week 9-10: User acceptance testing and refinement",
                "Week 11-12: Production deployment and team training",
            ]),
            requirements: strings(&[
                "Access to existing customer service data (tickets, transcripts, FAQs)",
                "Integration points for CRM, ticketing systems, and knowledge bases",
                "Stakeholder availability for weekly reviews",
                "Dedicated project manager from client side",
            ]),
            investment_range: "$75,000 - $150,000".into(),
            roi_timeline: "6-8 months".into(),
        },
        ImplementationPath {
            solution_type: "process automation".into(),
            timeline: "10-16 weeks".into(),
            phases: strings(&[
                "Week 1-3: Process mapping and automation opportunity analysis",
                "Week 4-6: Automation design and tool selection",
                "Week 7-12: Development and integration with existing systems",
                "Week 13-14: Testing and validation",
                "Week 15-16: Deployment and user training",
            ]),
            requirements: strings(&[
                "Documentation of current processes",
                "Access to systems to be automated",
                "IT support for integration and security requirements",
                "Change management team for adoption planning",
            ]),
            investment_range: "$100,000 - $250,000".into(),
            roi_timeline: "8-12 months".into(),
        },
        ImplementationPath {
            solution_type: "predictive analytics".into(),
            timeline: "12-20 weeks".into(),
            phases: strings(&[
                "Week 1-4: Data assessment and business objective definition",
                "Week 5-8: Data preparation and feature engineering",
                "Week 9-14: Model development and validation",
                "Week 15-18: Integration with BI tools and dashboards",
                "Week 19-20: Team training and knowledge transfer",
            ]),
            requirements: strings(&[
                "Historical business data (minimum 2 years preferred)",
                "Data warehouse or analytics platform access",
                "Subject matter experts for business context",
                "Analytics team for ongoing model monitoring",
            ]),
            investment_range: "$125,000 - $300,000".into(),
            roi_timeline: "9-15 months".into(),
        },
    ]
}
